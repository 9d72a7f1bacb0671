//! Data model shared by the API client and the view controllers
//!
//! Wire types mirror the backend JSON. `Aula`, `MaterialItem` and
//! `PerformanceRecord` are the canonical shapes produced by
//! [`crate::normalize`]; screens render them without further null checks.

use crate::performance::{toggle_tag, MaterialUsefulness, PerformanceTag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize an id that may arrive as a JSON string or number
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_string(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected string or number id, got {}", value)))
}

/// Optional variant of [`id_string`]; `null` and absent both map to `None`
pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

/// Treat `null` as the type's default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render a scalar JSON value as a string (strings, numbers, booleans)
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `{ "items": [...] }` list envelope used by every list endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemsEnvelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
}

impl<T> Default for ItemsEnvelope<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Response of the delete endpoints that return a body
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub deleted: bool,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
}

// ============================================================================
// Turmas and alunos
// ============================================================================

/// School class
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Turma {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Professor {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nome: String,
}

/// `GET /turmas/{id}` body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TurmaDetail {
    pub turma: Turma,
    #[serde(default, deserialize_with = "null_as_default")]
    pub professores: Vec<Professor>,
}

/// `{ "turma": {...} }` envelope returned by create/update
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TurmaEnvelope {
    pub turma: Turma,
}

/// Student as listed inside a class
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Aluno {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nome: String,
    #[serde(default, deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub turma_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turma_nome: Option<String>,
}

/// Extended student profile (`GET /students/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudentProfile {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nome: String,
    #[serde(default)]
    pub interesse: Option<String>,
    #[serde(default)]
    pub preferencia: Option<String>,
    #[serde(default)]
    pub dificuldade: Option<String>,
    #[serde(default)]
    pub laudo: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub recomendacoes: Option<String>,
    #[serde(default)]
    pub nivel_de_suporte: Option<String>,
    #[serde(default)]
    pub descricao_do_aluno: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub turma_id: Option<String>,
    #[serde(default)]
    pub turma_nome: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentProfileEnvelope {
    pub student_profile: StudentProfile,
}

// ============================================================================
// Aulas
// ============================================================================

/// Canonical lesson, fully populated by [`crate::normalize::normalize_aula`]
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Aula {
    pub id: String,
    pub titulo: String,
    pub assunto: String,
    /// Class name, "Turma não informada" when unknown
    pub turma: String,
    pub turma_id: Option<String>,
    pub turma_nome: Option<String>,
    pub data: String,
    pub descricao: String,
    /// Uploaded file metadata, passed through untouched
    pub arquivo: Option<Value>,
    /// Parsed upload blob (or the raw value when it was not JSON)
    pub upload_arquivo: Option<Value>,
}

/// Lesson creation form
#[derive(Debug, Clone, Default)]
pub struct AulaCreate {
    pub assunto: String,
    pub turma: String,
    pub turma_id: Option<String>,
    pub data: String,
    pub descricao: String,
    pub arquivo: Option<Value>,
}

impl AulaCreate {
    /// Build the POST body.
    ///
    /// The backend only stores `assunto`, `descricao` and `upload_arquivo`,
    /// so class and date travel inside the upload blob as well as top-level.
    pub fn to_payload(&self) -> Value {
        let mut upload = serde_json::Map::new();
        upload.insert("turma".into(), Value::String(self.turma.clone()));
        upload.insert("turma_nome".into(), Value::String(self.turma.clone()));
        if let Some(id) = &self.turma_id {
            upload.insert("turma_id".into(), Value::String(id.clone()));
        }
        upload.insert("data".into(), Value::String(self.data.clone()));
        if let Some(arquivo) = &self.arquivo {
            upload.insert("arquivo".into(), arquivo.clone());
        }

        serde_json::json!({
            "assunto": self.assunto,
            "turma": self.turma,
            "data": self.data,
            "descricao": self.descricao,
            "upload_arquivo": Value::Object(upload),
        })
    }
}

/// Partial lesson update (`PUT /aulas/{id}`)
#[derive(Debug, Clone, Default, Serialize)]
pub struct AulaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assunto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_arquivo: Option<Value>,
}

// ============================================================================
// Material
// ============================================================================

/// Lesson script
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Roteiro {
    #[serde(default)]
    pub topicos: Vec<String>,
    /// Teacher lines; a single long script is stored as one entry
    #[serde(default)]
    pub falas: Vec<String>,
    #[serde(default)]
    pub exemplos: Vec<String>,
}

/// Take-home summary
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Resumo {
    #[serde(default)]
    pub texto: String,
    #[serde(default)]
    pub exemplo: String,
}

/// Material stored for a lesson (`GET /material/aula/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MaterialItem {
    pub id: String,
    pub aula_id: String,
    pub roteiro: Roteiro,
    pub resumo: Resumo,
    pub source: String,
    pub accepted: bool,
    pub recomendacoes: Option<String>,
    pub exemplos: Vec<String>,
    pub perguntas: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Material returned by the generator, not yet accepted
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GeneratedMaterial {
    pub roteiro: Roteiro,
    pub resumo: Resumo,
    pub recomendacoes: Option<String>,
    pub exemplos: Vec<String>,
    pub perguntas: Vec<String>,
    /// "openai", "fallback" or "local"
    pub source: String,
}

impl GeneratedMaterial {
    /// Request body that stores this material as the lesson's accepted material
    pub fn accept_request(&self, aula_id: &str) -> MaterialAccept {
        MaterialAccept {
            aula_id: aula_id.to_string(),
            roteiro: self.roteiro.clone(),
            resumo: self.resumo.clone(),
            source: Some(self.source.clone()),
            accepted: true,
            recomendacoes_ia: self.recomendacoes.clone(),
        }
    }
}

/// `POST /material/accept` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialAccept {
    pub aula_id: String,
    pub roteiro: Roteiro,
    pub resumo: Resumo,
    pub source: Option<String>,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recomendacoes_ia: Option<String>,
}

/// `POST /material/generate` body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateMaterialRequest {
    pub assunto: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disciplina: Option<String>,
    pub descricao: String,
    pub turma: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperfocus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aluno_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turma_id: Option<String>,
}

impl GenerateMaterialRequest {
    pub fn for_aula(aula: &Aula) -> Self {
        Self {
            assunto: aula.assunto.clone(),
            descricao: aula.descricao.clone(),
            turma: aula.turma.clone(),
            data: aula.data.clone(),
            turma_id: aula.turma_id.clone(),
            ..Self::default()
        }
    }
}

/// `GET/POST /feedback/material`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MaterialFeedback {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub feedback_material: Option<String>,
}

/// `POST /feedback/material` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialFeedbackUpdate {
    pub arrmd_id: String,
    pub feedback_material: String,
}

// ============================================================================
// Desempenho
// ============================================================================

/// Tags recorded for one student in one lesson
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudentPerformance {
    pub aluno_id: String,
    pub desempenho: Vec<PerformanceTag>,
}

/// Performance registered for a lesson
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PerformanceRecord {
    pub aula_id: String,
    pub material_util: Option<MaterialUsefulness>,
    pub observacoes: String,
    pub alunos: Vec<StudentPerformance>,
}

impl PerformanceRecord {
    /// Tags recorded for the given student, empty when absent
    pub fn tags_for(&self, aluno_id: &str) -> &[PerformanceTag] {
        self.alunos
            .iter()
            .find(|entry| entry.aluno_id == aluno_id)
            .map(|entry| entry.desempenho.as_slice())
            .unwrap_or(&[])
    }
}

/// What the performance dialog collects before saving
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceDraft {
    pub material_util: Option<MaterialUsefulness>,
    pub observacoes: String,
    pub alunos: Vec<StudentPerformance>,
}

impl PerformanceDraft {
    /// Prefill the dialog from a saved record
    pub fn from_record(record: &PerformanceRecord) -> Self {
        Self {
            material_util: record.material_util,
            observacoes: record.observacoes.clone(),
            alunos: record.alunos.clone(),
        }
    }

    /// Toggle one tag for a student, adding the student when missing
    pub fn toggle(&mut self, aluno_id: &str, tag: PerformanceTag) {
        match self.alunos.iter_mut().find(|a| a.aluno_id == aluno_id) {
            Some(entry) => toggle_tag(&mut entry.desempenho, tag),
            None => self.alunos.push(StudentPerformance {
                aluno_id: aluno_id.to_string(),
                desempenho: vec![tag],
            }),
        }
    }

    pub fn to_payload(&self, aula_id: &str) -> PerformanceSave {
        PerformanceSave {
            arrmd_id: aula_id.to_string(),
            material_util: self.material_util,
            observacoes: if self.observacoes.trim().is_empty() {
                None
            } else {
                Some(self.observacoes.clone())
            },
            alunos: self.alunos.clone(),
        }
    }
}

/// `POST /feedback/performance` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSave {
    pub arrmd_id: String,
    pub material_util: Option<MaterialUsefulness>,
    pub observacoes: Option<String>,
    pub alunos: Vec<StudentPerformance>,
}

// ============================================================================
// Descriptions and recommendations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptionCreate {
    pub aluno_id: String,
    pub descricao: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DescriptionSaved {
    #[serde(deserialize_with = "id_string")]
    pub aluno_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub descricao: String,
}

/// `GET /recomendation` body; either field may be missing
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Recommendation {
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub recomendacoes_ia: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationCreate {
    pub aluno_id: String,
    pub arrmd_id: String,
    /// Free text written by the family
    pub observacoes: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecommendationResult {
    #[serde(deserialize_with = "id_string")]
    pub aluno_id: String,
    #[serde(deserialize_with = "id_string")]
    pub arrmd_id: String,
    pub observacoes: String,
    pub recomendacoes_ia: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_toggle() {
        let mut draft = PerformanceDraft::default();
        draft.toggle("s1", PerformanceTag::Atento);
        draft.toggle("s1", PerformanceTag::Focado);
        draft.toggle("s2", PerformanceTag::Disperso);
        draft.toggle("s1", PerformanceTag::Atento);

        assert_eq!(draft.alunos.len(), 2);
        assert_eq!(draft.alunos[0].desempenho, vec![PerformanceTag::Focado]);
        assert_eq!(draft.alunos[1].desempenho, vec![PerformanceTag::Disperso]);
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let turma: Turma = serde_json::from_value(json!({"id": 7, "nome": "6º A"})).unwrap();
        assert_eq!(turma.id, "7");
    }

    #[test]
    fn test_null_name_defaults_to_empty() {
        let aluno: Aluno = serde_json::from_value(json!({"id": "a", "nome": null})).unwrap();
        assert_eq!(aluno.nome, "");
        assert_eq!(aluno.turma_id, None);
    }

    #[test]
    fn test_items_envelope_null_items() {
        let env: ItemsEnvelope<Turma> = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(env.items.is_empty());
    }

    #[test]
    fn test_aula_create_payload_embeds_upload_blob() {
        let form = AulaCreate {
            assunto: "Frações".into(),
            turma: "5º B".into(),
            turma_id: Some("t-1".into()),
            data: "2024-04-02".into(),
            descricao: "Introdução".into(),
            arquivo: None,
        };
        let payload = form.to_payload();
        assert_eq!(payload["assunto"], "Frações");
        assert_eq!(payload["upload_arquivo"]["turma_id"], "t-1");
        assert_eq!(payload["upload_arquivo"]["data"], "2024-04-02");
        assert!(payload["upload_arquivo"].get("arquivo").is_none());
    }

    #[test]
    fn test_draft_payload_blank_observacoes_is_null() {
        let draft = PerformanceDraft {
            material_util: Some(MaterialUsefulness::Util),
            observacoes: "  ".into(),
            alunos: vec![StudentPerformance {
                aluno_id: "s1".into(),
                desempenho: vec![PerformanceTag::Atento],
            }],
        };
        let body = serde_json::to_value(draft.to_payload("aula-1")).unwrap();
        assert_eq!(
            body,
            json!({
                "arrmd_id": "aula-1",
                "material_util": "util",
                "observacoes": null,
                "alunos": [{"aluno_id": "s1", "desempenho": ["atento"]}]
            })
        );
    }

    #[test]
    fn test_tags_for_missing_student_is_empty() {
        let record = PerformanceRecord::default();
        assert!(record.tags_for("nobody").is_empty());
    }
}
