//! HTTP core shared by every resource API
//!
//! Sends JSON requests under `{base}/api/v1`, maps non-2xx statuses onto
//! [`ClientError`] and decodes bodies into `serde_json::Value` so the
//! normalization layer can deal with inconsistent payload shapes.

use super::aulas::AulasApi;
use super::description::DescriptionApi;
use super::error::{ClientError, Operation};
use super::material::MaterialApi;
use super::performance::PerformanceApi;
use super::recommendation::RecommendationApi;
use super::students::StudentsApi;
use super::turmas::TurmasApi;
use andori_common::config::ClientConfig;
use andori_common::normalize::list_items;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

const USER_AGENT: &str = concat!("andori/", env!("CARGO_PKG_VERSION"), " (", env!("ANDORI_BUILD"), ")");

/// Backend REST client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    api_root: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            http_client,
            api_root: config.api_root(),
        })
    }

    /// `{base}/api/v1`
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn turmas(&self) -> TurmasApi<'_> {
        TurmasApi::new(self)
    }

    pub fn students(&self) -> StudentsApi<'_> {
        StudentsApi::new(self)
    }

    pub fn aulas(&self) -> AulasApi<'_> {
        AulasApi::new(self)
    }

    pub fn material(&self) -> MaterialApi<'_> {
        MaterialApi::new(self)
    }

    pub fn performance(&self) -> PerformanceApi<'_> {
        PerformanceApi::new(self)
    }

    pub fn description(&self) -> DescriptionApi<'_> {
        DescriptionApi::new(self)
    }

    pub fn recommendation(&self) -> RecommendationApi<'_> {
        RecommendationApi::new(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    /// Send a request and return the decoded body (`Null` when empty)
    pub(crate) async fn request(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = self.url(path);
        debug!(method = %method, url = %url, "Sending backend request");

        let mut builder = self.http_client.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(method = %method, url = %url, error = %e, "Backend unreachable");
            ClientError::Network(e.to_string())
        })?;

        let response = check_status(operation, &method, &url, response).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            error!(url = %url, error = %e, "Backend returned invalid JSON");
            ClientError::Parse {
                operation,
                message: e.to_string(),
            }
        })
    }

    pub(crate) async fn get(&self, operation: Operation, path: &str) -> Result<Value, ClientError> {
        self.request(operation, Method::GET, path, &[], None).await
    }

    pub(crate) async fn get_with_query(
        &self,
        operation: Operation,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, ClientError> {
        self.request(operation, Method::GET, path, query, None).await
    }

    pub(crate) async fn send_json<B: Serialize>(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ClientError> {
        let body = serde_json::to_value(body).map_err(|e| ClientError::Parse {
            operation,
            message: e.to_string(),
        })?;
        self.request(operation, method, path, &[], Some(body)).await
    }

    pub(crate) async fn delete(&self, operation: Operation, path: &str) -> Result<Value, ClientError> {
        self.request(operation, Method::DELETE, path, &[], None).await
    }
}

async fn check_status(
    operation: Operation,
    method: &Method,
    url: &str,
    response: Response,
) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        debug!(method = %method, url = %url, status = status.as_u16(), "Backend responded");
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    if status == StatusCode::NOT_FOUND {
        debug!(method = %method, url = %url, "Backend returned 404");
        return Err(ClientError::NotFound {
            resource: operation.resource,
            body,
        });
    }

    error!(method = %method, url = %url, status = status.as_u16(), body = %body, "Backend request failed");

    if status == StatusCode::SERVICE_UNAVAILABLE {
        return Err(ClientError::ServiceUnavailable { body });
    }

    Err(ClientError::Api {
        operation,
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON value into a typed model
pub(crate) fn decode<T: DeserializeOwned>(operation: Operation, value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Parse {
        operation,
        message: e.to_string(),
    })
}

/// Decode a list response (`{items}` or bare array)
pub(crate) fn decode_list<T: DeserializeOwned>(
    operation: Operation,
    value: &Value,
) -> Result<Vec<T>, ClientError> {
    list_items(value)
        .iter()
        .cloned()
        .map(|item| decode(operation, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::Resource;
    use andori_common::models::Turma;
    use serde_json::json;

    #[test]
    fn test_api_root_from_config() {
        let client = ApiClient::new(&ClientConfig::with_base_url("http://localhost:8000/")).unwrap();
        assert_eq!(client.api_root(), "http://localhost:8000/api/v1");
        assert_eq!(client.url("/aulas"), "http://localhost:8000/api/v1/aulas");
    }

    #[test]
    fn test_decode_list_shapes() {
        let wrapped = json!({ "items": [{ "id": 1, "nome": "5º A" }] });
        let bare = json!([{ "id": "1", "nome": "5º A" }]);
        let a: Vec<Turma> = decode_list(Operation::LIST_TURMAS, &wrapped).unwrap();
        let b: Vec<Turma> = decode_list(Operation::LIST_TURMAS, &bare).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_reports_operation() {
        let err = decode::<Turma>(Operation::GET_TURMA, json!({ "nome": 3 })).unwrap_err();
        match err {
            ClientError::Parse { operation, .. } => {
                assert_eq!(operation.resource, Resource::Turma)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
