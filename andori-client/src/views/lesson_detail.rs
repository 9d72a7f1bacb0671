//! Lesson detail screen
//!
//! Opening a lesson runs two independent chains:
//! - lesson, then the class's students (resolving the class id by name when
//!   the lesson carries none)
//! - accepted material, then, only when material exists, the saved
//!   performance record
//!
//! Performance registration stays visible but disabled until the lesson has
//! material. Failed actions leave the previous state untouched and set an
//! inline error.

use super::request::{RequestHandle, RequestScope};
use super::{LoadState, ViewError, MATERIAL_REQUIRED_MESSAGE};
use crate::api::{ApiClient, ClientError};
use andori_common::events::{AndoriEvent, EventBus};
use andori_common::models::{
    Aluno, Aula, GeneratedMaterial, MaterialItem, PerformanceDraft, PerformanceRecord,
};
use andori_common::normalize::{apply_resolved_turma, find_turma_by_name, UNKNOWN_CLASS};
use andori_common::time::now;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Copy shown in the material card when the lesson has no material
pub const NO_MATERIAL_COPY: &str = "Você ainda não criou o material.";
pub const MATERIAL_PRESENT_COPY: &str = "Material criado e aprovado ✓";
pub const MATERIAL_LOADING_COPY: &str = "Carregando material...";

/// Everything the lesson screen renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonDetailState {
    pub aula_id: Option<String>,
    pub lesson: LoadState<Aula>,
    /// Empty list when the class has no students or could not be resolved
    pub students: LoadState<Vec<Aluno>>,
    /// Accepted material, canonical entry first
    pub material: LoadState<Vec<MaterialItem>>,
    /// `Loaded(None)` when nothing was registered yet
    pub performance: LoadState<Option<PerformanceRecord>>,
    pub saving_performance: bool,
    /// Inline error of the last failed action
    pub action_error: Option<String>,
}

/// Performance registration button as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceControl {
    pub visible: bool,
    pub enabled: bool,
    pub label: &'static str,
    /// Overlay shown while the control is locked
    pub hint: Option<&'static str>,
}

impl LessonDetailState {
    fn opening(aula_id: &str) -> Self {
        Self {
            aula_id: Some(aula_id.to_string()),
            lesson: LoadState::Loading,
            material: LoadState::Loading,
            ..Self::default()
        }
    }

    /// Canonical material of the lesson
    pub fn primary_material(&self) -> Option<&MaterialItem> {
        self.material.loaded().and_then(|items| items.first())
    }

    pub fn has_material(&self) -> bool {
        self.primary_material().is_some()
    }

    pub fn saved_performance(&self) -> Option<&PerformanceRecord> {
        self.performance.loaded().and_then(Option::as_ref)
    }

    pub fn performance_control(&self) -> PerformanceControl {
        let has_material = self.has_material();
        let has_record = self.saved_performance().is_some();
        let label = match (self.saving_performance, has_record) {
            (true, true) => "Aguarde...",
            (true, false) => "Salvando...",
            (false, true) => "Editar Desempenho",
            (false, false) => "Registrar Desempenho",
        };
        PerformanceControl {
            visible: true,
            enabled: has_material && !self.saving_performance,
            label,
            hint: if has_material {
                None
            } else {
                Some(MATERIAL_REQUIRED_MESSAGE)
            },
        }
    }

    pub fn material_copy(&self) -> &'static str {
        if self.material.is_loading() {
            MATERIAL_LOADING_COPY
        } else if self.has_material() {
            MATERIAL_PRESENT_COPY
        } else {
            NO_MATERIAL_COPY
        }
    }
}

pub struct LessonDetailController {
    client: ApiClient,
    events: EventBus,
    scope: RequestScope,
    state: Arc<RwLock<LessonDetailState>>,
}

impl LessonDetailController {
    pub fn new(client: ApiClient, events: EventBus) -> Self {
        Self {
            client,
            events,
            scope: RequestScope::new(),
            state: Arc::new(RwLock::new(LessonDetailState::default())),
        }
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> LessonDetailState {
        self.state.read().await.clone()
    }

    pub async fn performance_control(&self) -> PerformanceControl {
        self.state.read().await.performance_control()
    }

    pub async fn material_copy(&self) -> &'static str {
        self.state.read().await.material_copy()
    }

    /// Load the lesson screen.
    ///
    /// Fails only when the lesson itself cannot be loaded or the load was
    /// superseded; section failures are recorded in the state.
    pub async fn open(&self, aula_id: &str) -> Result<(), ViewError> {
        let (handle, replaced) = self.scope.begin();
        if let Some(previous) = replaced {
            self.events.emit_lossy(AndoriEvent::RequestCancelled {
                request_id: previous,
                timestamp: now(),
            });
        }
        *self.state.write().await = LessonDetailState::opening(aula_id);
        debug!(aula_id = %aula_id, request_id = %handle.id(), "Opening lesson");
        self.events.emit_lossy(AndoriEvent::ViewOpened {
            request_id: handle.id(),
            target_id: aula_id.to_string(),
            timestamp: now(),
        });

        let (lesson, ()) = tokio::join!(
            self.load_lesson_and_students(&handle, aula_id),
            self.load_material_and_performance(&handle, aula_id),
        );
        lesson
    }

    /// Cancel everything still in flight for this screen
    pub fn close(&self) {
        if let Some(id) = self.scope.cancel() {
            self.events.emit_lossy(AndoriEvent::RequestCancelled {
                request_id: id,
                timestamp: now(),
            });
        }
    }

    /// Apply a state change if `handle` is still the current request
    async fn apply<F>(&self, handle: &RequestHandle, update: F) -> bool
    where
        F: FnOnce(&mut LessonDetailState),
    {
        let mut state = self.state.write().await;
        if !self.scope.is_current(handle.id()) {
            debug!(request_id = %handle.id(), "Discarding stale lesson update");
            return false;
        }
        update(&mut *state);
        true
    }

    async fn load_lesson_and_students(
        &self,
        handle: &RequestHandle,
        aula_id: &str,
    ) -> Result<(), ViewError> {
        let aula = match handle.run(self.client.aulas().get(aula_id)).await {
            Ok(aula) => aula,
            Err(ViewError::Client(e)) => {
                let message = e.user_message();
                warn!(aula_id = %aula_id, error = %e, "Lesson failed to load");
                if self
                    .apply(handle, |s| s.lesson = LoadState::Failed(message.clone()))
                    .await
                {
                    self.events.emit_lossy(AndoriEvent::LessonLoadFailed {
                        request_id: handle.id(),
                        aula_id: aula_id.to_string(),
                        message,
                        timestamp: now(),
                    });
                }
                return Err(ViewError::Client(e));
            }
            Err(other) => return Err(other),
        };

        let mut turma_id = aula.turma_id.clone();
        let turma_nome = aula.turma.clone();
        let loaded = aula.clone();
        if !self
            .apply(handle, |s| {
                s.lesson = LoadState::Loaded(loaded);
                s.students = LoadState::Loading;
            })
            .await
        {
            return Err(ViewError::Cancelled);
        }
        info!(aula_id = %aula_id, "Lesson loaded");
        self.events.emit_lossy(AndoriEvent::LessonLoaded {
            request_id: handle.id(),
            aula_id: aula_id.to_string(),
            timestamp: now(),
        });

        if turma_id.is_none() && !turma_nome.trim().is_empty() && turma_nome != UNKNOWN_CLASS {
            match handle.run(self.client.turmas().list()).await {
                Ok(turmas) => match find_turma_by_name(&turmas, &turma_nome) {
                    Some(turma) => {
                        debug!(aula_id = %aula_id, turma_id = %turma.id, "Resolved class by name");
                        turma_id = Some(turma.id.clone());
                        self.apply(handle, |s| {
                            if let LoadState::Loaded(aula) = &mut s.lesson {
                                apply_resolved_turma(aula, turma);
                            }
                        })
                        .await;
                    }
                    None => {
                        warn!(aula_id = %aula_id, turma = %turma_nome, "No class matches the lesson's class name")
                    }
                },
                Err(ViewError::Client(e)) => {
                    warn!(aula_id = %aula_id, error = %e, "Could not resolve class by name")
                }
                Err(other) => return Err(other),
            }
        }

        let Some(turma_id) = turma_id else {
            debug!(aula_id = %aula_id, "Lesson has no class id, no students to load");
            if self.apply(handle, |s| s.students = LoadState::Loaded(Vec::new())).await {
                self.emit_students_loaded(aula_id, 0);
            }
            return Ok(());
        };

        match handle.run(self.client.students().list(Some(&turma_id))).await {
            Ok(students) => {
                let count = students.len();
                if self.apply(handle, |s| s.students = LoadState::Loaded(students)).await {
                    self.emit_students_loaded(aula_id, count);
                }
            }
            Err(ViewError::Client(e)) => {
                // The screen shows an empty roster rather than an error
                warn!(aula_id = %aula_id, turma_id = %turma_id, error = %e, "Students failed to load");
                self.apply(handle, |s| s.students = LoadState::Loaded(Vec::new()))
                    .await;
            }
            Err(other) => return Err(other),
        }
        Ok(())
    }

    fn emit_students_loaded(&self, aula_id: &str, count: usize) {
        self.events.emit_lossy(AndoriEvent::StudentsLoaded {
            aula_id: aula_id.to_string(),
            count,
            timestamp: now(),
        });
    }

    async fn load_material_and_performance(&self, handle: &RequestHandle, aula_id: &str) {
        let items = match handle.run(self.client.material().list_by_aula(aula_id)).await {
            Ok(items) => items,
            Err(ViewError::Client(e)) if e.is_not_found() => Vec::new(),
            Err(ViewError::Client(e)) => {
                warn!(aula_id = %aula_id, error = %e, "Material failed to load");
                let message = e.user_message();
                self.apply(handle, |s| {
                    s.material = LoadState::Failed(message);
                    s.performance = LoadState::Idle;
                })
                .await;
                return;
            }
            Err(_) => return,
        };

        let present = !items.is_empty();
        let applied = self
            .apply(handle, |s| {
                s.material = LoadState::Loaded(items);
                s.performance = if present {
                    LoadState::Loading
                } else {
                    LoadState::Idle
                };
            })
            .await;
        if !applied {
            return;
        }
        self.events.emit_lossy(AndoriEvent::MaterialLoaded {
            aula_id: aula_id.to_string(),
            present,
            timestamp: now(),
        });

        if present {
            self.load_performance(handle, aula_id).await;
        }
    }

    async fn load_performance(&self, handle: &RequestHandle, aula_id: &str) {
        let record = match handle.run(self.client.performance().get(aula_id)).await {
            Ok(record) => record,
            Err(ViewError::Client(e)) if e.is_not_found() => None,
            Err(ViewError::Client(e)) => {
                warn!(aula_id = %aula_id, error = %e, "Performance failed to load");
                let message = e.user_message();
                self.apply(handle, |s| s.performance = LoadState::Failed(message))
                    .await;
                return;
            }
            Err(_) => return,
        };

        let present = record.is_some();
        if self
            .apply(handle, |s| s.performance = LoadState::Loaded(record))
            .await
        {
            self.events.emit_lossy(AndoriEvent::PerformanceLoaded {
                aula_id: aula_id.to_string(),
                present,
                timestamp: now(),
            });
        }
    }

    /// Claim the performance slot for an action.
    ///
    /// Returns the lesson id and the handle of the current request.
    async fn begin_performance_action(&self) -> Result<(String, RequestHandle), ViewError> {
        let mut state = self.state.write().await;
        let handle = self.scope.current().ok_or(ViewError::Cancelled)?;
        let aula_id = state
            .aula_id
            .clone()
            .ok_or_else(|| ViewError::Invalid("Aula não encontrada.".to_string()))?;
        if !state.has_material() {
            return Err(ViewError::MaterialRequired);
        }
        if state.saving_performance {
            return Err(ViewError::Busy);
        }
        state.saving_performance = true;
        state.action_error = None;
        Ok((aula_id, handle))
    }

    /// Release the performance slot and apply the outcome
    async fn finish_action<T, F>(
        &self,
        handle: &RequestHandle,
        action: &str,
        result: Result<T, ViewError>,
        on_success: F,
    ) -> Result<T, ViewError>
    where
        F: FnOnce(&mut LessonDetailState, &T),
    {
        let mut state = self.state.write().await;
        let current = self.scope.is_current(handle.id());
        if current {
            state.saving_performance = false;
        }
        match result {
            Ok(value) => {
                if current {
                    on_success(&mut *state, &value);
                }
                Ok(value)
            }
            Err(e) => {
                if current && !matches!(e, ViewError::Cancelled) {
                    let message = e.user_message();
                    warn!(action = %action, error = %e, "Lesson action failed");
                    state.action_error = Some(message.clone());
                    self.events.emit_lossy(AndoriEvent::ActionFailed {
                        action: action.to_string(),
                        message,
                        timestamp: now(),
                    });
                }
                Err(e)
            }
        }
    }

    /// Save the performance dialog. Requires material; one save at a time.
    pub async fn save_performance(
        &self,
        draft: &PerformanceDraft,
    ) -> Result<PerformanceRecord, ViewError> {
        let (aula_id, handle) = self.begin_performance_action().await?;
        let result = handle
            .run(self.client.performance().save(&aula_id, draft))
            .await;
        let record = self
            .finish_action(&handle, "save_performance", result, |s, record| {
                s.performance = LoadState::Loaded(Some(record.clone()));
            })
            .await?;
        info!(aula_id = %aula_id, alunos = record.alunos.len(), "Performance saved");
        self.events.emit_lossy(AndoriEvent::PerformanceSaved {
            aula_id,
            timestamp: now(),
        });
        Ok(record)
    }

    pub async fn delete_performance(&self) -> Result<(), ViewError> {
        let (aula_id, handle) = self.begin_performance_action().await?;
        let result = handle
            .run(self.client.performance().delete(&aula_id))
            .await;
        self.finish_action(&handle, "delete_performance", result, |s, _| {
            s.performance = LoadState::Loaded(None);
        })
        .await?;
        info!(aula_id = %aula_id, "Performance deleted");
        self.events.emit_lossy(AndoriEvent::PerformanceDeleted {
            aula_id,
            timestamp: now(),
        });
        Ok(())
    }

    async fn current_lesson(&self) -> Result<(String, RequestHandle), ViewError> {
        let state = self.state.read().await;
        let handle = self.scope.current().ok_or(ViewError::Cancelled)?;
        let aula_id = state
            .aula_id
            .clone()
            .ok_or_else(|| ViewError::Invalid("Aula não encontrada.".to_string()))?;
        Ok((aula_id, handle))
    }

    async fn record_action_error(&self, handle: &RequestHandle, action: &str, error: &ClientError) {
        let message = error.user_message();
        warn!(action = %action, error = %error, "Lesson action failed");
        if self
            .apply(handle, |s| s.action_error = Some(message.clone()))
            .await
        {
            self.events.emit_lossy(AndoriEvent::ActionFailed {
                action: action.to_string(),
                message,
                timestamp: now(),
            });
        }
    }

    /// Accept a generated draft as the lesson's canonical material
    pub async fn accept_material(
        &self,
        material: &GeneratedMaterial,
    ) -> Result<MaterialItem, ViewError> {
        let (aula_id, handle) = self.current_lesson().await?;
        let request = material.accept_request(&aula_id);
        let item = match handle.run(self.client.material().accept(&request)).await {
            Ok(item) => item,
            Err(ViewError::Client(e)) => {
                self.record_action_error(&handle, "accept_material", &e).await;
                return Err(ViewError::Client(e));
            }
            Err(other) => return Err(other),
        };

        let accepted = item.clone();
        let mut needs_performance = false;
        self.apply(&handle, |s| {
            let mut items = vec![accepted];
            if let LoadState::Loaded(existing) = &s.material {
                items.extend(existing.iter().cloned());
            }
            s.material = LoadState::Loaded(items);
            s.action_error = None;
            if s.performance.loaded().is_none() {
                s.performance = LoadState::Loading;
                needs_performance = true;
            }
        })
        .await;
        self.events.emit_lossy(AndoriEvent::MaterialAccepted {
            aula_id: aula_id.clone(),
            timestamp: now(),
        });

        if needs_performance {
            self.load_performance(&handle, &aula_id).await;
        }
        Ok(item)
    }

    /// Delete the canonical material
    pub async fn delete_material(&self) -> Result<(), ViewError> {
        let (aula_id, handle) = self.current_lesson().await?;
        let material_id = {
            let state = self.state.read().await;
            state
                .primary_material()
                .map(|m| m.id.clone())
                .filter(|id| !id.is_empty())
                .ok_or(ViewError::MaterialRequired)?
        };

        match handle
            .run(self.client.material().delete(&material_id))
            .await
        {
            Ok(_) => {}
            Err(ViewError::Client(e)) => {
                self.record_action_error(&handle, "delete_material", &e).await;
                return Err(ViewError::Client(e));
            }
            Err(other) => return Err(other),
        }

        self.apply(&handle, |s| {
            if let LoadState::Loaded(items) = &mut s.material {
                items.retain(|m| m.id != material_id);
                if items.is_empty() {
                    s.performance = LoadState::Idle;
                }
            }
            s.action_error = None;
        })
        .await;
        info!(aula_id = %aula_id, material_id = %material_id, "Material deleted");
        self.events.emit_lossy(AndoriEvent::MaterialDeleted {
            aula_id,
            timestamp: now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use andori_common::models::StudentPerformance;

    fn material(id: &str) -> MaterialItem {
        MaterialItem {
            id: id.to_string(),
            aula_id: "a1".to_string(),
            accepted: true,
            ..MaterialItem::default()
        }
    }

    #[test]
    fn test_control_disabled_without_material() {
        let state = LessonDetailState {
            material: LoadState::Loaded(Vec::new()),
            ..LessonDetailState::default()
        };
        let control = state.performance_control();
        assert!(control.visible);
        assert!(!control.enabled);
        assert_eq!(control.label, "Registrar Desempenho");
        assert_eq!(control.hint, Some(MATERIAL_REQUIRED_MESSAGE));
        assert_eq!(state.material_copy(), NO_MATERIAL_COPY);
    }

    #[test]
    fn test_control_with_material_and_record() {
        let mut state = LessonDetailState {
            material: LoadState::Loaded(vec![material("m1")]),
            performance: LoadState::Loaded(Some(PerformanceRecord {
                aula_id: "a1".to_string(),
                alunos: vec![StudentPerformance::default()],
                ..PerformanceRecord::default()
            })),
            ..LessonDetailState::default()
        };
        let control = state.performance_control();
        assert!(control.enabled);
        assert_eq!(control.label, "Editar Desempenho");
        assert_eq!(control.hint, None);
        assert_eq!(state.material_copy(), MATERIAL_PRESENT_COPY);

        state.saving_performance = true;
        let control = state.performance_control();
        assert!(!control.enabled);
        assert_eq!(control.label, "Aguarde...");
    }

    #[test]
    fn test_primary_material_is_first() {
        let state = LessonDetailState {
            material: LoadState::Loaded(vec![material("m2"), material("m1")]),
            ..LessonDetailState::default()
        };
        assert_eq!(state.primary_material().map(|m| m.id.as_str()), Some("m2"));
    }

    #[test]
    fn test_loading_copy() {
        let state = LessonDetailState::opening("a1");
        assert_eq!(state.material_copy(), MATERIAL_LOADING_COPY);
        assert!(!state.performance_control().enabled);
    }
}
