//! `/material` and `/feedback/material` endpoints

use super::client::{decode, ApiClient};
use super::error::{ClientError, Operation};
use super::turmas::delete_response;
use andori_common::models::{
    DeleteResponse, GenerateMaterialRequest, GeneratedMaterial, MaterialAccept, MaterialFeedback,
    MaterialFeedbackUpdate, MaterialItem,
};
use andori_common::normalize::{
    normalize_generated_material, normalize_material, normalize_material_list, unwrap_envelope,
};
use reqwest::Method;

pub struct MaterialApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MaterialApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Ask the backend generator for a draft
    pub async fn generate(
        &self,
        request: &GenerateMaterialRequest,
    ) -> Result<GeneratedMaterial, ClientError> {
        let body = self
            .client
            .send_json(
                Operation::GENERATE_MATERIAL,
                Method::POST,
                "/material/generate",
                request,
            )
            .await?;
        Ok(normalize_generated_material(&body))
    }

    /// Accepted material of a lesson; the first entry is canonical
    pub async fn list_by_aula(&self, aula_id: &str) -> Result<Vec<MaterialItem>, ClientError> {
        let body = self
            .client
            .get(Operation::LIST_MATERIAL, &format!("/material/aula/{}", aula_id))
            .await?;
        Ok(normalize_material_list(&body))
    }

    pub async fn accept(&self, accept: &MaterialAccept) -> Result<MaterialItem, ClientError> {
        let body = self
            .client
            .send_json(
                Operation::ACCEPT_MATERIAL,
                Method::POST,
                "/material/accept",
                accept,
            )
            .await?;
        let mut item = normalize_material(&unwrap_envelope(body, "material"));
        if item.aula_id.is_empty() {
            item.aula_id = accept.aula_id.clone();
        }
        Ok(item)
    }

    pub async fn delete(&self, material_id: &str) -> Result<DeleteResponse, ClientError> {
        let body = self
            .client
            .delete(Operation::DELETE_MATERIAL, &format!("/material/{}", material_id))
            .await?;
        delete_response(Operation::DELETE_MATERIAL, body, material_id)
    }

    /// Store the teacher's free-text opinion about a lesson's material
    pub async fn set_feedback(
        &self,
        aula_id: &str,
        feedback: &str,
    ) -> Result<MaterialFeedback, ClientError> {
        let payload = MaterialFeedbackUpdate {
            arrmd_id: aula_id.to_string(),
            feedback_material: feedback.to_string(),
        };
        let body = self
            .client
            .send_json(
                Operation::SET_MATERIAL_FEEDBACK,
                Method::POST,
                "/feedback/material",
                &payload,
            )
            .await?;
        decode(Operation::SET_MATERIAL_FEEDBACK, body)
    }

    pub async fn get_feedback(&self, aula_id: &str) -> Result<MaterialFeedback, ClientError> {
        let body = self
            .client
            .get(
                Operation::GET_MATERIAL_FEEDBACK,
                &format!("/feedback/material/{}", aula_id),
            )
            .await?;
        decode(Operation::GET_MATERIAL_FEEDBACK, body)
    }
}
