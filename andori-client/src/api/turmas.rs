//! `/turmas` endpoints

use super::client::{decode, decode_list, ApiClient};
use super::error::{ClientError, Operation};
use andori_common::models::{Aluno, DeleteResponse, Turma, TurmaDetail};
use andori_common::normalize::unwrap_envelope;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct TurmaPayload<'a> {
    nome: &'a str,
}

pub struct TurmasApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TurmasApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Turma>, ClientError> {
        let body = self.client.get(Operation::LIST_TURMAS, "/turmas").await?;
        decode_list(Operation::LIST_TURMAS, &body)
    }

    /// Class with its teachers
    pub async fn get(&self, id: &str) -> Result<TurmaDetail, ClientError> {
        let body = self
            .client
            .get(Operation::GET_TURMA, &format!("/turmas/{}", id))
            .await?;
        decode(Operation::GET_TURMA, body)
    }

    pub async fn create(&self, nome: &str) -> Result<Turma, ClientError> {
        let body = self
            .client
            .send_json(Operation::CREATE_TURMA, Method::POST, "/turmas", &TurmaPayload { nome })
            .await?;
        decode(Operation::CREATE_TURMA, unwrap_envelope(body, "turma"))
    }

    pub async fn update(&self, id: &str, nome: &str) -> Result<Turma, ClientError> {
        let body = self
            .client
            .send_json(
                Operation::UPDATE_TURMA,
                Method::PUT,
                &format!("/turmas/{}", id),
                &TurmaPayload { nome },
            )
            .await?;
        decode(Operation::UPDATE_TURMA, unwrap_envelope(body, "turma"))
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteResponse, ClientError> {
        let body = self
            .client
            .delete(Operation::DELETE_TURMA, &format!("/turmas/{}", id))
            .await?;
        delete_response(Operation::DELETE_TURMA, body, id)
    }

    /// Students enrolled in the class
    pub async fn students(&self, id: &str) -> Result<Vec<Aluno>, ClientError> {
        let body = self
            .client
            .get(Operation::LIST_TURMA_STUDENTS, &format!("/turmas/{}/students", id))
            .await?;
        decode_list(Operation::LIST_TURMA_STUDENTS, &body)
    }
}

/// Delete endpoints answer either `{deleted, id}` or 204 with no body
pub(crate) fn delete_response(
    operation: Operation,
    body: Value,
    id: &str,
) -> Result<DeleteResponse, ClientError> {
    if body.is_null() {
        return Ok(DeleteResponse {
            deleted: true,
            id: Some(id.to_string()),
        });
    }
    decode(operation, body)
}
