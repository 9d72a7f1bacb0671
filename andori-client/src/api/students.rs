//! `/students` endpoints

use super::client::{decode, decode_list, ApiClient};
use super::error::{ClientError, Operation};
use andori_common::models::{Aluno, StudentProfile};
use andori_common::normalize::unwrap_envelope;

pub struct StudentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> StudentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All students, or only those of one class
    pub async fn list(&self, turma_id: Option<&str>) -> Result<Vec<Aluno>, ClientError> {
        let query: Vec<(&str, &str)> = turma_id.map(|id| ("turma_id", id)).into_iter().collect();
        let body = self
            .client
            .get_with_query(Operation::LIST_STUDENTS, "/students", &query)
            .await?;
        decode_list(Operation::LIST_STUDENTS, &body)
    }

    /// Extended profile; accepts `{student_profile: {...}}` or the bare object
    pub async fn get(&self, id: &str) -> Result<StudentProfile, ClientError> {
        let body = self
            .client
            .get(Operation::GET_STUDENT, &format!("/students/{}", id))
            .await?;
        decode(Operation::GET_STUDENT, unwrap_envelope(body, "student_profile"))
    }
}
