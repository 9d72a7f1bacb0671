//! View-state events
//!
//! Controllers broadcast every state transition on an [`EventBus`] so a
//! front end (or a test) can follow the view without polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// State transition of a lesson or student view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AndoriEvent {
    /// A view started loading; superseded requests are cancelled
    ViewOpened {
        request_id: Uuid,
        target_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Request dropped because a newer one replaced it
    RequestCancelled {
        request_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    LessonLoaded {
        request_id: Uuid,
        aula_id: String,
        timestamp: DateTime<Utc>,
    },

    LessonLoadFailed {
        request_id: Uuid,
        aula_id: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    StudentsLoaded {
        aula_id: String,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    MaterialLoaded {
        aula_id: String,
        present: bool,
        timestamp: DateTime<Utc>,
    },

    MaterialGenerated {
        aula_id: String,
        source: String,
        timestamp: DateTime<Utc>,
    },

    MaterialAccepted {
        aula_id: String,
        timestamp: DateTime<Utc>,
    },

    MaterialDeleted {
        aula_id: String,
        timestamp: DateTime<Utc>,
    },

    PerformanceLoaded {
        aula_id: String,
        present: bool,
        timestamp: DateTime<Utc>,
    },

    PerformanceSaved {
        aula_id: String,
        timestamp: DateTime<Utc>,
    },

    PerformanceDeleted {
        aula_id: String,
        timestamp: DateTime<Utc>,
    },

    StudentProfileLoaded {
        request_id: Uuid,
        aluno_id: String,
        timestamp: DateTime<Utc>,
    },

    StudentProfileFailed {
        request_id: Uuid,
        aluno_id: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    RecommendationLoaded {
        aluno_id: String,
        present: bool,
        timestamp: DateTime<Utc>,
    },

    DescriptionSaved {
        aluno_id: String,
        timestamp: DateTime<Utc>,
    },

    /// An action failed and left the previous state in place
    ActionFailed {
        action: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl AndoriEvent {
    /// Event name, as serialized in the `type` field
    pub fn event_type(&self) -> &'static str {
        match self {
            AndoriEvent::ViewOpened { .. } => "ViewOpened",
            AndoriEvent::RequestCancelled { .. } => "RequestCancelled",
            AndoriEvent::LessonLoaded { .. } => "LessonLoaded",
            AndoriEvent::LessonLoadFailed { .. } => "LessonLoadFailed",
            AndoriEvent::StudentsLoaded { .. } => "StudentsLoaded",
            AndoriEvent::MaterialLoaded { .. } => "MaterialLoaded",
            AndoriEvent::MaterialGenerated { .. } => "MaterialGenerated",
            AndoriEvent::MaterialAccepted { .. } => "MaterialAccepted",
            AndoriEvent::MaterialDeleted { .. } => "MaterialDeleted",
            AndoriEvent::PerformanceLoaded { .. } => "PerformanceLoaded",
            AndoriEvent::PerformanceSaved { .. } => "PerformanceSaved",
            AndoriEvent::PerformanceDeleted { .. } => "PerformanceDeleted",
            AndoriEvent::StudentProfileLoaded { .. } => "StudentProfileLoaded",
            AndoriEvent::StudentProfileFailed { .. } => "StudentProfileFailed",
            AndoriEvent::RecommendationLoaded { .. } => "RecommendationLoaded",
            AndoriEvent::DescriptionSaved { .. } => "DescriptionSaved",
            AndoriEvent::ActionFailed { .. } => "ActionFailed",
        }
    }
}

/// Broadcast channel for [`AndoriEvent`]s
///
/// Cloning shares the same channel. Slow subscribers lose the oldest events
/// once `capacity` is exceeded.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AndoriEvent>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<AndoriEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: AndoriEvent,
    ) -> Result<usize, broadcast::error::SendError<AndoriEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: AndoriEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
