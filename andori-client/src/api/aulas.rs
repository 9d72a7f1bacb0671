//! `/aulas` endpoints
//!
//! Every lesson leaving this module has gone through `normalize_aula`.

use super::client::ApiClient;
use super::error::{ClientError, Operation};
use andori_common::models::{Aula, AulaCreate, AulaUpdate};
use andori_common::normalize::{normalize_aula, normalize_aula_list, unwrap_envelope};
use reqwest::Method;

pub struct AulasApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AulasApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Aula>, ClientError> {
        let body = self.client.get(Operation::LIST_AULAS, "/aulas").await?;
        Ok(normalize_aula_list(&body))
    }

    pub async fn get(&self, id: &str) -> Result<Aula, ClientError> {
        let body = self
            .client
            .get(Operation::GET_AULA, &format!("/aulas/{}", id))
            .await?;
        Ok(normalize_aula(&unwrap_envelope(body, "aula"), Some(id)))
    }

    pub async fn create(&self, aula: &AulaCreate) -> Result<Aula, ClientError> {
        let body = self
            .client
            .send_json(Operation::CREATE_AULA, Method::POST, "/aulas", &aula.to_payload())
            .await?;
        Ok(normalize_aula(&unwrap_envelope(body, "aula"), None))
    }

    pub async fn update(&self, id: &str, update: &AulaUpdate) -> Result<Aula, ClientError> {
        let body = self
            .client
            .send_json(
                Operation::UPDATE_AULA,
                Method::PUT,
                &format!("/aulas/{}", id),
                update,
            )
            .await?;
        Ok(normalize_aula(&unwrap_envelope(body, "aula"), Some(id)))
    }

    /// The backend answers 204 No Content
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete(Operation::DELETE_AULA, &format!("/aulas/{}", id))
            .await?;
        Ok(())
    }
}
