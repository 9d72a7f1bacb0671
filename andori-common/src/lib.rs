//! # Andori Common Library
//!
//! Shared code for the Andori teacher tools including:
//! - Data model for turmas, alunos, aulas, material and desempenho
//! - Normalization of inconsistent backend payloads
//! - Performance scoring and avatar selection
//! - Offline lesson-material generator
//! - Configuration loading
//! - Event types for view-state transitions

pub mod avatar;
pub mod config;
pub mod error;
pub mod events;
pub mod lesson_material;
pub mod models;
pub mod normalize;
pub mod performance;
pub mod time;

pub use error::{Error, Result};
pub use models::{Aula, MaterialItem, PerformanceRecord, StudentProfile, Turma};
pub use performance::{MaterialUsefulness, PerformanceTag};
