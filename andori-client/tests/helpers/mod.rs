//! Test Helper Utilities
//!
//! Stub backend for client tests: an axum router served on an ephemeral
//! local port, with every route nested under `/api/v1`.

#![allow(dead_code)]

use andori_client::ApiClient;
use andori_common::config::ClientConfig;
use axum::Router;
use std::sync::{Arc, Mutex};

/// Requests seen by a stub route (raw query strings or bodies)
pub type Hits = Arc<Mutex<Vec<String>>>;

pub fn hits() -> Hits {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn recorded(hits: &Hits) -> Vec<String> {
    hits.lock().unwrap().clone()
}

/// Serve `api` under `/api/v1` and return the backend origin
pub async fn spawn_backend(api: Router) -> String {
    let app = Router::new().nest("/api/v1", api);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn client_for(api: Router) -> ApiClient {
    let base_url = spawn_backend(api).await;
    ApiClient::new(&ClientConfig::with_base_url(&base_url)).unwrap()
}

/// Client pointed at a local port nothing listens on
pub fn unreachable_client() -> ApiClient {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    ApiClient::new(&ClientConfig::with_base_url(&format!("http://127.0.0.1:{}", port))).unwrap()
}
