//! Screen controllers
//!
//! Each controller owns the state of one screen, drives the backend calls
//! that fill it and broadcasts every transition on the [`EventBus`].
//! Reopening a screen cancels whatever the previous opening still had in
//! flight; see [`request::RequestScope`].
//!
//! [`EventBus`]: andori_common::events::EventBus

pub mod lesson_detail;
pub mod request;
pub mod student_profile;

use crate::api::ClientError;
use thiserror::Error;

pub use lesson_detail::{LessonDetailController, LessonDetailState, PerformanceControl};
pub use request::{RequestHandle, RequestScope};
pub use student_profile::{StudentProfileController, StudentProfileState};

/// Hint shown while performance registration is locked
pub const MATERIAL_REQUIRED_MESSAGE: &str =
    "Crie o material da aula primeiro para poder registrar o desempenho";

/// Controller action errors
#[derive(Debug, Error)]
pub enum ViewError {
    /// Superseded by a newer request or the screen was closed
    #[error("Request cancelled")]
    Cancelled,

    #[error("Lesson has no material yet")]
    MaterialRequired,

    /// A save for this screen is already in flight
    #[error("Another save is in progress")]
    Busy,

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ViewError {
    pub fn user_message(&self) -> String {
        match self {
            ViewError::Cancelled => "Operação cancelada.".to_string(),
            ViewError::MaterialRequired => format!("{}.", MATERIAL_REQUIRED_MESSAGE),
            ViewError::Busy => "Aguarde o término da operação em andamento.".to_string(),
            ViewError::Invalid(message) => message.clone(),
            ViewError::Client(e) => e.user_message(),
        }
    }
}

/// Progress of one independently loaded section of a screen
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// User-facing error copy
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
