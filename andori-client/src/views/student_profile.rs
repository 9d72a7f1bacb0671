//! Student profile screen
//!
//! Loads the profile first, then in parallel the lessons of the student's
//! class (with their performance records) and the recommendations.

use super::request::{RequestHandle, RequestScope};
use super::{LoadState, ViewError};
use crate::api::ApiClient;
use crate::legacy_store::{performance_key, LegacyStore};
use andori_common::avatar::select_student_image;
use andori_common::events::{AndoriEvent, EventBus};
use andori_common::models::{Aula, PerformanceRecord, Recommendation, StudentProfile};
use andori_common::normalize::{lesson_belongs_to_class, normalize_performance, UNKNOWN_CLASS};
use andori_common::performance::{chart_series, tag_counts, ChartPoint, PerformanceTag};
use andori_common::time::now;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const EMPTY_DESCRIPTION_MESSAGE: &str = "Descreva como esse aluno se comporta para salvar.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentProfileState {
    pub aluno_id: Option<String>,
    pub profile: LoadState<StudentProfile>,
    /// Lessons of the student's class, in backend order
    pub lessons: LoadState<Vec<Aula>>,
    /// Performance records by lesson id
    pub performance: HashMap<String, PerformanceRecord>,
    pub recommendation: LoadState<Recommendation>,
    pub descricao: String,
    pub saving_description: bool,
    pub description_error: Option<String>,
}

impl StudentProfileState {
    fn opening(aluno_id: &str) -> Self {
        Self {
            aluno_id: Some(aluno_id.to_string()),
            profile: LoadState::Loading,
            ..Self::default()
        }
    }

    /// Header image, stable per student
    pub fn avatar(&self) -> &'static str {
        select_student_image(self.aluno_id.as_deref().unwrap_or_default())
    }

    pub fn turma_label(&self) -> String {
        match self
            .profile
            .loaded()
            .and_then(|p| p.turma_nome.as_deref())
            .filter(|n| !n.trim().is_empty())
        {
            Some(nome) => format!("Turma {}", nome),
            None => UNKNOWN_CLASS.to_string(),
        }
    }

    /// How often each tag was given to this student
    pub fn tag_counts(&self) -> Vec<(PerformanceTag, usize)> {
        match &self.aluno_id {
            Some(id) => tag_counts(id, self.performance.values()),
            None => tag_counts("", std::iter::empty()),
        }
    }

    /// One point per lesson with recorded tags
    pub fn chart(&self) -> Vec<ChartPoint> {
        match (&self.aluno_id, self.lessons.loaded()) {
            (Some(id), Some(lessons)) => chart_series(lessons, id, &self.performance),
            _ => Vec::new(),
        }
    }
}

pub struct StudentProfileController {
    client: ApiClient,
    events: EventBus,
    legacy: Option<LegacyStore>,
    scope: RequestScope,
    state: Arc<RwLock<StudentProfileState>>,
}

impl StudentProfileController {
    pub fn new(client: ApiClient, events: EventBus) -> Self {
        Self {
            client,
            events,
            legacy: None,
            scope: RequestScope::new(),
            state: Arc::new(RwLock::new(StudentProfileState::default())),
        }
    }

    /// Read performance snapshots from the local store while the backend is down
    pub fn with_legacy_store(mut self, store: LegacyStore) -> Self {
        self.legacy = Some(store);
        self
    }

    pub async fn state(&self) -> StudentProfileState {
        self.state.read().await.clone()
    }

    pub fn close(&self) {
        if let Some(id) = self.scope.cancel() {
            self.events.emit_lossy(AndoriEvent::RequestCancelled {
                request_id: id,
                timestamp: now(),
            });
        }
    }

    async fn apply<F>(&self, handle: &RequestHandle, update: F) -> bool
    where
        F: FnOnce(&mut StudentProfileState),
    {
        let mut state = self.state.write().await;
        if !self.scope.is_current(handle.id()) {
            debug!(request_id = %handle.id(), "Discarding stale profile update");
            return false;
        }
        update(&mut *state);
        true
    }

    pub async fn open(&self, aluno_id: &str) -> Result<(), ViewError> {
        let (handle, replaced) = self.scope.begin();
        if let Some(previous) = replaced {
            self.events.emit_lossy(AndoriEvent::RequestCancelled {
                request_id: previous,
                timestamp: now(),
            });
        }
        *self.state.write().await = StudentProfileState::opening(aluno_id);
        self.events.emit_lossy(AndoriEvent::ViewOpened {
            request_id: handle.id(),
            target_id: aluno_id.to_string(),
            timestamp: now(),
        });

        let profile = match handle.run(self.client.students().get(aluno_id)).await {
            Ok(profile) => profile,
            Err(ViewError::Client(e)) => {
                let message = e.user_message();
                warn!(aluno_id = %aluno_id, error = %e, "Student profile failed to load");
                if self
                    .apply(&handle, |s| s.profile = LoadState::Failed(message.clone()))
                    .await
                {
                    self.events.emit_lossy(AndoriEvent::StudentProfileFailed {
                        request_id: handle.id(),
                        aluno_id: aluno_id.to_string(),
                        message,
                        timestamp: now(),
                    });
                }
                return Err(ViewError::Client(e));
            }
            Err(other) => return Err(other),
        };

        let loaded = profile.clone();
        if !self
            .apply(&handle, |s| {
                s.descricao = loaded.descricao_do_aluno.clone().unwrap_or_default();
                s.profile = LoadState::Loaded(loaded);
                s.lessons = LoadState::Loading;
                s.recommendation = LoadState::Loading;
            })
            .await
        {
            return Err(ViewError::Cancelled);
        }
        info!(aluno_id = %aluno_id, "Student profile loaded");
        self.events.emit_lossy(AndoriEvent::StudentProfileLoaded {
            request_id: handle.id(),
            aluno_id: aluno_id.to_string(),
            timestamp: now(),
        });

        let (lessons, recommendation) = tokio::join!(
            self.load_lessons(&handle, &profile),
            self.load_recommendation(&handle, aluno_id),
        );
        lessons?;
        recommendation
    }

    async fn load_lessons(
        &self,
        handle: &RequestHandle,
        profile: &StudentProfile,
    ) -> Result<(), ViewError> {
        let lessons = match handle.run(self.client.aulas().list()).await {
            Ok(all) => all
                .into_iter()
                .filter(|aula| {
                    lesson_belongs_to_class(
                        aula,
                        profile.turma_id.as_deref(),
                        profile.turma_nome.as_deref(),
                    )
                })
                .collect::<Vec<_>>(),
            Err(ViewError::Client(e)) => {
                warn!(aluno_id = %profile.id, error = %e, "Lessons failed to load");
                let message = e.user_message();
                self.apply(handle, |s| s.lessons = LoadState::Failed(message))
                    .await;
                return Ok(());
            }
            Err(other) => return Err(other),
        };
        debug!(aluno_id = %profile.id, count = lessons.len(), "Lessons of the student's class");

        let mut records = HashMap::new();
        for aula in &lessons {
            match handle.run(self.client.performance().get(&aula.id)).await {
                Ok(Some(record)) => {
                    records.insert(aula.id.clone(), record);
                }
                Ok(None) => {}
                Err(ViewError::Client(e)) if e.is_not_found() => {}
                Err(ViewError::Client(e)) if e.is_backend_unavailable() => {
                    if let Some(record) = self.legacy_performance(&aula.id).await {
                        records.insert(aula.id.clone(), record);
                    }
                }
                Err(ViewError::Client(e)) => {
                    warn!(aula_id = %aula.id, error = %e, "Skipping lesson performance")
                }
                Err(other) => return Err(other),
            }
        }

        self.apply(handle, |s| {
            s.lessons = LoadState::Loaded(lessons);
            s.performance = records;
        })
        .await;
        Ok(())
    }

    async fn legacy_performance(&self, aula_id: &str) -> Option<PerformanceRecord> {
        let store = self.legacy.as_ref()?;
        match store.get::<serde_json::Value>(&performance_key(aula_id)).await {
            Ok(raw) => raw.and_then(|raw| normalize_performance(&raw, aula_id)),
            Err(e) => {
                warn!(aula_id = %aula_id, error = %e, "Could not read local performance snapshot");
                None
            }
        }
    }

    async fn load_recommendation(
        &self,
        handle: &RequestHandle,
        aluno_id: &str,
    ) -> Result<(), ViewError> {
        let (state, present) = match handle
            .run(self.client.recommendation().get(Some(aluno_id), None))
            .await
        {
            Ok(recommendation) => (LoadState::Loaded(recommendation), true),
            Err(ViewError::Client(e)) => {
                if !e.is_not_found() {
                    warn!(aluno_id = %aluno_id, error = %e, "Recommendations failed to load");
                }
                (LoadState::Failed(e.user_message()), false)
            }
            Err(other) => return Err(other),
        };

        if self.apply(handle, |s| s.recommendation = state).await {
            self.events.emit_lossy(AndoriEvent::RecommendationLoaded {
                aluno_id: aluno_id.to_string(),
                present,
                timestamp: now(),
            });
        }
        Ok(())
    }

    /// Save the teacher's description of the student
    pub async fn save_description(&self, text: &str) -> Result<String, ViewError> {
        let texto = text.trim().to_string();
        let (aluno_id, handle) = {
            let mut state = self.state.write().await;
            let handle = self.scope.current().ok_or(ViewError::Cancelled)?;
            let aluno_id = match state.profile.loaded() {
                Some(profile) => profile.id.clone(),
                None => return Err(ViewError::Invalid("Aluno não encontrado.".to_string())),
            };
            if texto.is_empty() {
                state.description_error = Some(EMPTY_DESCRIPTION_MESSAGE.to_string());
                return Err(ViewError::Invalid(EMPTY_DESCRIPTION_MESSAGE.to_string()));
            }
            if state.saving_description {
                return Err(ViewError::Busy);
            }
            state.saving_description = true;
            state.description_error = None;
            (aluno_id, handle)
        };

        let result = handle
            .run(self.client.description().save(&aluno_id, &texto))
            .await;

        let mut state = self.state.write().await;
        let current = self.scope.is_current(handle.id());
        if current {
            state.saving_description = false;
        }
        match result {
            Ok(saved) => {
                let descricao = if saved.descricao.trim().is_empty() {
                    texto
                } else {
                    saved.descricao
                };
                if current {
                    state.descricao = descricao.clone();
                }
                info!(aluno_id = %aluno_id, "Description saved");
                self.events.emit_lossy(AndoriEvent::DescriptionSaved {
                    aluno_id,
                    timestamp: now(),
                });
                Ok(descricao)
            }
            Err(e) => {
                if current && !matches!(e, ViewError::Cancelled) {
                    warn!(aluno_id = %aluno_id, error = %e, "Description failed to save");
                    state.description_error = Some(e.user_message());
                }
                Err(e)
            }
        }
    }
}
