//! `/feedback/performance` endpoints

use super::client::ApiClient;
use super::error::{ClientError, Operation};
use andori_common::models::{PerformanceDraft, PerformanceRecord};
use andori_common::normalize::normalize_performance;
use reqwest::Method;

pub struct PerformanceApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PerformanceApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Saved performance of a lesson; `None` when the backend answers `null`.
    ///
    /// A lesson without any record answers 404, surfaced as
    /// [`ClientError::NotFound`].
    pub async fn get(&self, aula_id: &str) -> Result<Option<PerformanceRecord>, ClientError> {
        let body = self
            .client
            .get(
                Operation::GET_PERFORMANCE,
                &format!("/feedback/performance/{}", aula_id),
            )
            .await?;
        Ok(normalize_performance(&body, aula_id))
    }

    /// Create or replace the lesson's record
    pub async fn save(
        &self,
        aula_id: &str,
        draft: &PerformanceDraft,
    ) -> Result<PerformanceRecord, ClientError> {
        let payload = draft.to_payload(aula_id);
        let body = self
            .client
            .send_json(
                Operation::SAVE_PERFORMANCE,
                Method::POST,
                "/feedback/performance",
                &payload,
            )
            .await?;

        // Older backends answer without a body
        Ok(normalize_performance(&body, aula_id).unwrap_or_else(|| PerformanceRecord {
            aula_id: aula_id.to_string(),
            material_util: payload.material_util,
            observacoes: payload.observacoes.unwrap_or_default(),
            alunos: payload.alunos,
        }))
    }

    pub async fn delete(&self, aula_id: &str) -> Result<(), ClientError> {
        self.client
            .delete(
                Operation::DELETE_PERFORMANCE,
                &format!("/feedback/performance/{}", aula_id),
            )
            .await?;
        Ok(())
    }
}
