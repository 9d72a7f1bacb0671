//! Material generation with offline fallback
//!
//! Drafts come from the backend generator. When the backend is unreachable
//! (or has no database) the local generator produces the draft instead, and
//! drafts are cached in the [`LegacyStore`] until accepted or discarded.

use crate::api::{ApiClient, ClientError};
use crate::legacy_store::{material_accepted_key, material_key, LegacyStore};
use andori_common::events::{AndoriEvent, EventBus};
use andori_common::lesson_material::{generate_lesson_material, LessonRequest};
use andori_common::models::{Aula, GenerateMaterialRequest, GeneratedMaterial, MaterialItem};
use andori_common::time::now;
use tracing::{info, warn};

pub struct MaterialService {
    client: ApiClient,
    store: LegacyStore,
    events: Option<EventBus>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl MaterialService {
    pub fn new(client: ApiClient, store: LegacyStore) -> Self {
        Self {
            client,
            store,
            events: None,
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: AndoriEvent) {
        if let Some(bus) = &self.events {
            bus.emit_lossy(event);
        }
    }

    /// Generate a draft for the lesson and cache it locally
    pub async fn generate(
        &self,
        aula: &Aula,
        feedback: Option<&str>,
        hyperfocus: Option<&str>,
    ) -> Result<GeneratedMaterial, ClientError> {
        let request = GenerateMaterialRequest {
            feedback: non_blank(feedback),
            hyperfocus: non_blank(hyperfocus),
            ..GenerateMaterialRequest::for_aula(aula)
        };

        let material = match self.client.material().generate(&request).await {
            Ok(material) => material,
            Err(e) if e.is_backend_unavailable() => {
                warn!(aula_id = %aula.id, error = %e, "Backend generator unavailable, generating locally");
                generate_lesson_material(&LessonRequest {
                    assunto: request.assunto.clone(),
                    descricao: request.descricao.clone(),
                    turma: request.turma.clone(),
                    data: request.data.clone(),
                    feedback: request.feedback.clone(),
                    hyperfocus: request.hyperfocus.clone(),
                })
                .into_generated()
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = self.store.put(&material_key(&aula.id), &material).await {
            warn!(aula_id = %aula.id, error = %e, "Could not cache material draft");
        }

        info!(aula_id = %aula.id, source = %material.source, "Material generated");
        self.emit(AndoriEvent::MaterialGenerated {
            aula_id: aula.id.clone(),
            source: material.source.clone(),
            timestamp: now(),
        });
        Ok(material)
    }

    /// Draft cached by the last `generate` for this lesson
    pub async fn cached_draft(&self, aula_id: &str) -> Option<GeneratedMaterial> {
        match self.store.get(&material_key(aula_id)).await {
            Ok(draft) => draft,
            Err(e) => {
                warn!(aula_id = %aula_id, error = %e, "Could not read cached material draft");
                None
            }
        }
    }

    /// Accept a draft as the lesson's material.
    ///
    /// Without a backend the accepted copy is kept locally and returned
    /// unsaved (empty id).
    pub async fn accept(
        &self,
        aula_id: &str,
        material: &GeneratedMaterial,
    ) -> Result<MaterialItem, ClientError> {
        let request = material.accept_request(aula_id);
        let item = match self.client.material().accept(&request).await {
            Ok(item) => item,
            Err(e) if e.is_backend_unavailable() => {
                warn!(aula_id = %aula_id, error = %e, "Backend unavailable, keeping accepted material locally");
                if let Err(store_err) = self.store.put(&material_accepted_key(aula_id), material).await {
                    warn!(aula_id = %aula_id, error = %store_err, "Could not store accepted material");
                    return Err(e);
                }
                MaterialItem {
                    aula_id: aula_id.to_string(),
                    roteiro: material.roteiro.clone(),
                    resumo: material.resumo.clone(),
                    source: material.source.clone(),
                    accepted: true,
                    recomendacoes: material.recomendacoes.clone(),
                    exemplos: material.exemplos.clone(),
                    perguntas: material.perguntas.clone(),
                    ..MaterialItem::default()
                }
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = self.store.remove(&material_key(aula_id)).await {
            warn!(aula_id = %aula_id, error = %e, "Could not clear material draft");
        }
        self.emit(AndoriEvent::MaterialAccepted {
            aula_id: aula_id.to_string(),
            timestamp: now(),
        });
        Ok(item)
    }

    /// Material accepted while the backend was unreachable
    pub async fn pending_accepted(&self, aula_id: &str) -> Option<GeneratedMaterial> {
        self.store
            .get(&material_accepted_key(aula_id))
            .await
            .ok()
            .flatten()
    }

    /// Forget every local copy of the lesson's material
    pub async fn discard(&self, aula_id: &str) -> andori_common::Result<()> {
        self.store.clear_material(aula_id).await
    }
}
