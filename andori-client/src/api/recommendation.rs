//! `/recomendation` endpoints
//!
//! The path keeps the backend's spelling.

use super::client::{decode, ApiClient};
use super::error::{ClientError, Operation};
use andori_common::models::{Recommendation, RecommendationCreate, RecommendationResult};
use reqwest::Method;

pub struct RecommendationApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RecommendationApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Family notes (by student) and/or AI recommendations (by lesson).
    ///
    /// 404 when neither exists yet.
    pub async fn get(
        &self,
        aluno_id: Option<&str>,
        aula_id: Option<&str>,
    ) -> Result<Recommendation, ClientError> {
        let mut query = Vec::new();
        if let Some(id) = aluno_id {
            query.push(("aluno_id", id));
        }
        if let Some(id) = aula_id {
            query.push(("arrmd_id", id));
        }
        let body = self
            .client
            .get_with_query(Operation::GET_RECOMMENDATION, "/recomendation", &query)
            .await?;
        decode(Operation::GET_RECOMMENDATION, body)
    }

    /// Submit family notes and generate recommendations for a lesson
    pub async fn create(
        &self,
        request: &RecommendationCreate,
    ) -> Result<RecommendationResult, ClientError> {
        let body = self
            .client
            .send_json(
                Operation::CREATE_RECOMMENDATION,
                Method::POST,
                "/recomendation/",
                request,
            )
            .await?;
        decode(Operation::CREATE_RECOMMENDATION, body)
    }
}
