//! # Andori Client
//!
//! Teacher-facing front-end core for the Andori backend:
//! - REST client for turmas, alunos, aulas, material and desempenho
//! - Material generation with an offline fallback
//! - Lesson and student screen controllers with request cancellation
//! - Plain-text rendering of the screens for the `andori` CLI

pub mod api;
pub mod generation;
pub mod legacy_store;
pub mod render;
pub mod views;

pub use api::{ApiClient, ClientError};
pub use generation::MaterialService;
pub use legacy_store::LegacyStore;
