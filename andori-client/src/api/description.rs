//! `/description` endpoint

use super::client::{decode, ApiClient};
use super::error::{ClientError, Operation};
use andori_common::models::{DescriptionCreate, DescriptionSaved};
use reqwest::Method;

pub struct DescriptionApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DescriptionApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Save the teacher's description of how a student behaves
    pub async fn save(&self, aluno_id: &str, descricao: &str) -> Result<DescriptionSaved, ClientError> {
        let payload = DescriptionCreate {
            aluno_id: aluno_id.to_string(),
            descricao: descricao.to_string(),
        };
        let body = self
            .client
            .send_json(Operation::SAVE_DESCRIPTION, Method::POST, "/description/", &payload)
            .await?;
        decode(Operation::SAVE_DESCRIPTION, body)
    }
}
