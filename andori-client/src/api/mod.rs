//! Backend REST API client

pub mod aulas;
pub mod client;
pub mod description;
pub mod error;
pub mod material;
pub mod performance;
pub mod recommendation;
pub mod students;
pub mod turmas;

pub use client::ApiClient;
pub use error::{ClientError, Operation, Resource};
