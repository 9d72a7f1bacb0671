//! Normalization of backend payloads into canonical view models
//!
//! Backend responses place lesson fields either top-level or inside the
//! `upload_arquivo` blob, which may itself be a JSON-encoded string. Each
//! entity has one precedence table below; a field resolves to the first
//! non-null value in its chain, then to the row's default.
//!
//! Every function here is pure. Normalizing the JSON of an already
//! normalized value yields the same value.

use crate::models::{
    value_to_string, Aula, GeneratedMaterial, MaterialItem, PerformanceRecord, Resumo, Roteiro,
    StudentPerformance, Turma,
};
use crate::performance::{dedup_tags, MaterialUsefulness, PerformanceTag};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::warn;

/// Title used when neither `assunto` nor `titulo` is present
pub const UNTITLED_LESSON: &str = "Aula sem título";
/// Class label used when the lesson carries no class name
pub const UNKNOWN_CLASS: &str = "Turma não informada";
/// Source label when the backend did not say who produced the material
pub const UNKNOWN_SOURCE: &str = "desconhecido";

/// Where to look for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Top-level key of the raw payload
    Top(&'static str),
    /// Key inside the parsed `upload_arquivo` blob
    Upload(&'static str),
}

/// Value used when the whole chain misses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Text(&'static str),
    Absent,
}

/// One row of a precedence table
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub chain: &'static [Lookup],
    pub default: FieldDefault,
}

use Lookup::{Top, Upload};

macro_rules! field_rule {
    ($name:ident, $field:literal, [$($step:expr),+ $(,)?], $default:expr) => {
        pub const $name: FieldRule = FieldRule {
            field: $field,
            chain: &[$($step),+],
            default: $default,
        };
    };
}

// Aula: top-level, then top-level alias, then upload blob
field_rule!(AULA_TITULO, "titulo", [Top("titulo"), Top("assunto"), Upload("titulo"), Upload("assunto")], FieldDefault::Text(UNTITLED_LESSON));
field_rule!(AULA_ASSUNTO, "assunto", [Top("assunto"), Top("titulo"), Upload("assunto"), Upload("titulo")], FieldDefault::Text(UNTITLED_LESSON));
field_rule!(AULA_TURMA, "turma", [Top("turma"), Top("turma_nome"), Upload("turma"), Upload("turma_nome")], FieldDefault::Text(UNKNOWN_CLASS));
field_rule!(AULA_TURMA_ID, "turma_id", [Top("turma_id"), Top("turmaId"), Upload("turma_id"), Upload("turmaId")], FieldDefault::Absent);
field_rule!(AULA_TURMA_NOME, "turma_nome", [Top("turma_nome"), Upload("turma_nome")], FieldDefault::Absent);
field_rule!(AULA_DATA, "data", [Top("data"), Upload("data")], FieldDefault::Text(""));
field_rule!(AULA_DESCRICAO, "descricao", [Top("descricao"), Upload("descricao")], FieldDefault::Text(""));
field_rule!(AULA_ARQUIVO, "arquivo", [Top("arquivo"), Upload("arquivo")], FieldDefault::Absent);

/// Aula precedence table
pub const AULA_FIELDS: &[FieldRule] = &[
    AULA_TITULO,
    AULA_ASSUNTO,
    AULA_TURMA,
    AULA_TURMA_ID,
    AULA_TURMA_NOME,
    AULA_DATA,
    AULA_DESCRICAO,
    AULA_ARQUIVO,
];

// Material (stored and generated)
field_rule!(MATERIAL_ID, "id", [Top("id"), Top("material_id")], FieldDefault::Text(""));
field_rule!(MATERIAL_AULA_ID, "aula_id", [Top("aula_id"), Top("arrmd_id")], FieldDefault::Text(""));
field_rule!(MATERIAL_SOURCE, "source", [Top("source")], FieldDefault::Text(UNKNOWN_SOURCE));
field_rule!(MATERIAL_RECOMENDACOES, "recomendacoes", [Top("recomendacoes"), Top("recomendacoes_ia")], FieldDefault::Absent);
field_rule!(MATERIAL_CREATED_AT, "created_at", [Top("created_at"), Top("createdAt")], FieldDefault::Absent);

/// Material precedence table
pub const MATERIAL_FIELDS: &[FieldRule] = &[
    MATERIAL_ID,
    MATERIAL_AULA_ID,
    MATERIAL_SOURCE,
    MATERIAL_RECOMENDACOES,
    MATERIAL_CREATED_AT,
];

// Performance; camelCase keys come from the old local snapshots
field_rule!(PERFORMANCE_AULA_ID, "aula_id", [Top("arrmd_id"), Top("aula_id")], FieldDefault::Absent);
field_rule!(PERFORMANCE_MATERIAL_UTIL, "material_util", [Top("material_util"), Top("materialUtil")], FieldDefault::Absent);
field_rule!(PERFORMANCE_OBSERVACOES, "observacoes", [Top("observacoes")], FieldDefault::Text(""));
field_rule!(PERFORMANCE_ALUNO_ID, "aluno_id", [Top("aluno_id"), Top("alunoId")], FieldDefault::Absent);

/// Performance precedence table
pub const PERFORMANCE_FIELDS: &[FieldRule] = &[
    PERFORMANCE_AULA_ID,
    PERFORMANCE_MATERIAL_UTIL,
    PERFORMANCE_OBSERVACOES,
    PERFORMANCE_ALUNO_ID,
];

/// Raw payload plus its parsed upload blob
struct PayloadView<'a> {
    top: &'a Map<String, Value>,
    upload: Option<&'a Map<String, Value>>,
}

impl<'a> PayloadView<'a> {
    fn get(&self, step: &Lookup) -> Option<&'a Value> {
        let value = match step {
            Top(key) => self.top.get(*key),
            Upload(key) => self.upload.and_then(|u| u.get(*key)),
        };
        value.filter(|v| !v.is_null())
    }

    fn lookup(&self, chain: &[Lookup]) -> Option<&'a Value> {
        chain.iter().find_map(|step| self.get(step))
    }

    fn text(&self, rule: &FieldRule) -> Option<String> {
        self.lookup(rule.chain)
            .and_then(value_to_string)
            .or_else(|| match rule.default {
                FieldDefault::Text(s) => Some(s.to_string()),
                FieldDefault::Absent => None,
            })
    }

    /// Identifiers: empty strings count as missing
    fn id(&self, rule: &FieldRule) -> Option<String> {
        rule.chain.iter().find_map(|step| {
            self.get(step)
                .and_then(value_to_string)
                .filter(|s| !s.trim().is_empty())
        })
    }

    fn value(&self, rule: &FieldRule) -> Option<Value> {
        self.lookup(rule.chain).cloned()
    }
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

/// Parse the `upload_arquivo` blob.
///
/// Strings are decoded as JSON; a string that does not decode to an object is
/// treated as absent. Objects are used as-is. Anything else is absent.
pub fn parse_upload_blob(raw: Option<&Value>) -> Option<Map<String, Value>> {
    match raw? {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Ignoring upload_arquivo that is not valid JSON");
                None
            }
        },
        Value::Object(map) => Some(map.clone()),
        _ => None,
    }
}

/// Accept both `{ key: {...} }` and the bare object
pub fn unwrap_envelope(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.get(key).map_or(false, Value::is_object) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Normalize a raw lesson payload.
///
/// `fallback_id` is used when the payload carries no `id` (the id the screen
/// was opened with).
pub fn normalize_aula(raw: &Value, fallback_id: Option<&str>) -> Aula {
    let top = raw.as_object().unwrap_or_else(|| empty_map());
    let upload = parse_upload_blob(top.get("upload_arquivo"));
    let view = PayloadView {
        top,
        upload: upload.as_ref(),
    };

    let text = |rule: &FieldRule| view.text(rule).unwrap_or_default();

    let id = top
        .get("id")
        .and_then(value_to_string)
        .or_else(|| fallback_id.map(str::to_string))
        .unwrap_or_default();

    let upload_arquivo = match &upload {
        Some(map) => Some(Value::Object(map.clone())),
        None => top.get("upload_arquivo").filter(|v| !v.is_null()).cloned(),
    };

    Aula {
        id,
        titulo: text(&AULA_TITULO),
        assunto: text(&AULA_ASSUNTO),
        turma: text(&AULA_TURMA),
        turma_id: view.id(&AULA_TURMA_ID),
        turma_nome: view.text(&AULA_TURMA_NOME),
        data: text(&AULA_DATA),
        descricao: text(&AULA_DESCRICAO),
        arquivo: view.value(&AULA_ARQUIVO),
        upload_arquivo,
    }
}

/// Normalize a list response (`{items}` or bare array) of lessons
pub fn normalize_aula_list(raw: &Value) -> Vec<Aula> {
    list_items(raw)
        .iter()
        .map(|item| normalize_aula(item, None))
        .collect()
}

/// Items of a list response: bare array, `{items: [...]}`, else empty
pub fn list_items(raw: &Value) -> &[Value] {
    match raw {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn is_known_class_name(name: &str) -> bool {
    !name.trim().is_empty() && name != UNKNOWN_CLASS
}

/// Find a class by case-insensitive trimmed name equality
pub fn find_turma_by_name<'a>(turmas: &'a [Turma], name: &str) -> Option<&'a Turma> {
    if !is_known_class_name(name) {
        return None;
    }
    turmas.iter().find(|t| is_known_class_name(&t.nome) && same_name(&t.nome, name))
}

/// Record the class resolved by name on the lesson
pub fn apply_resolved_turma(aula: &mut Aula, turma: &Turma) {
    aula.turma_id = Some(turma.id.clone());
    aula.turma = turma.nome.clone();
}

/// Whether a lesson belongs to the class a student is enrolled in.
///
/// Ids are compared when both sides have one; otherwise names are compared
/// case-insensitively after trimming. With neither, the lesson is excluded.
pub fn lesson_belongs_to_class(aula: &Aula, turma_id: Option<&str>, turma_nome: Option<&str>) -> bool {
    if let (Some(student_turma), Some(aula_turma)) = (turma_id, aula.turma_id.as_deref()) {
        return student_turma == aula_turma;
    }
    match turma_nome {
        Some(nome) if is_known_class_name(nome) && is_known_class_name(&aula.turma) => {
            same_name(nome, &aula.turma)
        }
        _ => false,
    }
}

// ============================================================================
// Material
// ============================================================================

/// List of strings from a string-or-array value
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
        _ => Vec::new(),
    }
}

/// Script from either the structured object or the older plain-text script
pub fn normalize_roteiro(value: Option<&Value>) -> Roteiro {
    match value {
        Some(Value::Object(map)) => Roteiro {
            topicos: string_list(map.get("topicos")),
            falas: string_list(map.get("falas")),
            exemplos: string_list(map.get("exemplos")),
        },
        Some(Value::String(s)) => Roteiro {
            falas: vec![s.clone()],
            ..Roteiro::default()
        },
        _ => Roteiro::default(),
    }
}

/// Summary from either the structured object or plain text
pub fn normalize_resumo(value: Option<&Value>) -> Resumo {
    match value {
        Some(Value::Object(map)) => Resumo {
            texto: map.get("texto").and_then(value_to_string).unwrap_or_default(),
            exemplo: map.get("exemplo").and_then(value_to_string).unwrap_or_default(),
        },
        Some(Value::String(s)) => Resumo {
            texto: s.clone(),
            exemplo: String::new(),
        },
        _ => Resumo::default(),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    // Naive timestamps are stored in UTC
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Normalize one stored material record
pub fn normalize_material(raw: &Value) -> MaterialItem {
    let top = raw.as_object().unwrap_or_else(|| empty_map());
    let view = PayloadView { top, upload: None };
    let text = |rule: &FieldRule| view.text(rule).unwrap_or_default();

    MaterialItem {
        id: text(&MATERIAL_ID),
        aula_id: text(&MATERIAL_AULA_ID),
        roteiro: normalize_roteiro(top.get("roteiro")),
        resumo: normalize_resumo(top.get("resumo")),
        source: text(&MATERIAL_SOURCE),
        accepted: top.get("accepted").and_then(Value::as_bool).unwrap_or(true),
        recomendacoes: view.text(&MATERIAL_RECOMENDACOES),
        exemplos: string_list(top.get("exemplos")),
        perguntas: string_list(top.get("perguntas")),
        created_at: view
            .text(&MATERIAL_CREATED_AT)
            .as_deref()
            .and_then(parse_timestamp),
    }
}

/// Normalize the material list of a lesson (bare array or `{items}`).
///
/// The first entry is the lesson's canonical material.
pub fn normalize_material_list(raw: &Value) -> Vec<MaterialItem> {
    list_items(raw).iter().map(normalize_material).collect()
}

/// Normalize a generator response: `{material: {...}, source}` or flat
pub fn normalize_generated_material(raw: &Value) -> GeneratedMaterial {
    let outer = raw.as_object().unwrap_or_else(|| empty_map());
    let inner = outer
        .get("material")
        .and_then(Value::as_object)
        .unwrap_or(outer);

    let source = inner
        .get("source")
        .or_else(|| outer.get("source"))
        .and_then(value_to_string)
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

    let mut roteiro = normalize_roteiro(inner.get("roteiro"));
    if roteiro.exemplos.is_empty() {
        roteiro.exemplos = string_list(inner.get("exemplos"));
    }

    GeneratedMaterial {
        roteiro,
        resumo: normalize_resumo(inner.get("resumo")),
        recomendacoes: inner.get("recomendacoes").and_then(value_to_string),
        exemplos: string_list(inner.get("exemplos")),
        perguntas: string_list(inner.get("perguntas")),
        source,
    }
}

// ============================================================================
// Performance
// ============================================================================

fn normalize_tags(value: Option<&Value>) -> Vec<PerformanceTag> {
    let parsed = value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter_map(|s| match s.parse::<PerformanceTag>() {
            Ok(tag) => Some(tag),
            Err(_) => {
                warn!(value = %s, "Dropping unknown desempenho tag");
                None
            }
        });
    dedup_tags(parsed)
}

/// Normalize a stored performance record. `null` means nothing was registered.
pub fn normalize_performance(raw: &Value, aula_id: &str) -> Option<PerformanceRecord> {
    let top = raw.as_object()?;
    let view = PayloadView { top, upload: None };

    let alunos = top
        .get("alunos")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let entry_map = entry.as_object()?;
                    let entry_view = PayloadView {
                        top: entry_map,
                        upload: None,
                    };
                    Some(StudentPerformance {
                        aluno_id: entry_view.id(&PERFORMANCE_ALUNO_ID)?,
                        desempenho: normalize_tags(entry_map.get("desempenho")),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(PerformanceRecord {
        aula_id: view
            .id(&PERFORMANCE_AULA_ID)
            .unwrap_or_else(|| aula_id.to_string()),
        material_util: view
            .text(&PERFORMANCE_MATERIAL_UTIL)
            .and_then(|s| s.parse::<MaterialUsefulness>().ok()),
        observacoes: view
            .text(&PERFORMANCE_OBSERVACOES)
            .unwrap_or_default(),
        alunos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tables_have_unique_fields() {
        for table in [AULA_FIELDS, MATERIAL_FIELDS, PERFORMANCE_FIELDS] {
            let mut fields: Vec<_> = table.iter().map(|r| r.field).collect();
            fields.sort_unstable();
            fields.dedup();
            assert_eq!(fields.len(), table.len());
        }
    }

    #[test]
    fn test_top_level_precedes_upload_in_every_chain() {
        for rule in AULA_FIELDS {
            let first_upload = rule.chain.iter().position(|l| matches!(l, Upload(_)));
            let last_top = rule.chain.iter().rposition(|l| matches!(l, Top(_)));
            if let (Some(upload), Some(top)) = (first_upload, last_top) {
                assert!(top < upload, "{} consults upload before top-level", rule.field);
            }
        }
    }

    #[test]
    fn test_upload_string_is_parsed() {
        let raw = json!({
            "id": "a1",
            "assunto": "Relevo",
            "upload_arquivo": "{\"turma\": \"6º A\", \"turma_id\": \"t9\", \"data\": \"2024-05-02\"}"
        });
        let aula = normalize_aula(&raw, None);
        assert_eq!(aula.turma, "6º A");
        assert_eq!(aula.turma_id.as_deref(), Some("t9"));
        assert_eq!(aula.data, "2024-05-02");
        assert!(aula.upload_arquivo.as_ref().unwrap().is_object());
    }

    #[test]
    fn test_unparseable_upload_is_absent() {
        let raw = json!({"id": "a1", "upload_arquivo": "not json {"});
        let aula = normalize_aula(&raw, None);
        assert_eq!(aula.turma, UNKNOWN_CLASS);
        assert_eq!(aula.turma_id, None);
        assert_eq!(aula.upload_arquivo, Some(json!("not json {")));
    }

    #[test]
    fn test_defaults_fill_empty_payload() {
        let aula = normalize_aula(&json!({}), Some("from-url"));
        assert_eq!(aula.id, "from-url");
        assert_eq!(aula.titulo, UNTITLED_LESSON);
        assert_eq!(aula.assunto, UNTITLED_LESSON);
        assert_eq!(aula.turma, UNKNOWN_CLASS);
        assert_eq!(aula.data, "");
        assert_eq!(aula.descricao, "");
        assert_eq!(aula.arquivo, None);
    }

    #[test]
    fn test_titulo_alias_used_when_assunto_missing() {
        let aula = normalize_aula(&json!({"id": 3, "titulo": "Vulcões"}), None);
        assert_eq!(aula.id, "3");
        assert_eq!(aula.assunto, "Vulcões");
        assert_eq!(aula.titulo, "Vulcões");
    }

    #[test]
    fn test_empty_turma_id_is_absent() {
        let aula = normalize_aula(&json!({"turma_id": "", "upload_arquivo": {"turma_id": "t2"}}), None);
        assert_eq!(aula.turma_id.as_deref(), Some("t2"));
    }

    #[test]
    fn test_unwrap_envelope_both_shapes() {
        let wrapped = json!({"aula": {"id": "x"}});
        assert_eq!(unwrap_envelope(wrapped, "aula"), json!({"id": "x"}));
        let bare = json!({"id": "x", "aula": "not an object"});
        assert_eq!(unwrap_envelope(bare.clone(), "aula"), bare);
    }

    #[test]
    fn test_find_turma_by_name_trims_and_ignores_case() {
        let turmas = vec![
            Turma { id: "1".into(), nome: "5º B".into() },
            Turma { id: "2".into(), nome: " 6º A ".into() },
        ];
        assert_eq!(find_turma_by_name(&turmas, "6º a").map(|t| t.id.as_str()), Some("2"));
        assert!(find_turma_by_name(&turmas, UNKNOWN_CLASS).is_none());
        assert!(find_turma_by_name(&turmas, "7º C").is_none());
    }

    #[test]
    fn test_lesson_class_match_prefers_ids() {
        let aula = Aula {
            turma: "6º A".into(),
            turma_id: Some("t1".into()),
            ..Aula::default()
        };
        assert!(lesson_belongs_to_class(&aula, Some("t1"), Some("outra")));
        assert!(!lesson_belongs_to_class(&aula, Some("t2"), Some("6º A")));
        assert!(lesson_belongs_to_class(&aula, None, Some(" 6º a ")));
        assert!(!lesson_belongs_to_class(&aula, None, None));
    }

    #[test]
    fn test_material_with_string_falas() {
        let raw = json!([{
            "id": "m1",
            "aula_id": "a1",
            "roteiro": {"topicos": ["x"], "falas": "Bom dia, turma!"},
            "resumo": {"texto": "t", "exemplo": "e"},
            "source": "openai",
            "accepted": true,
            "created_at": "2024-05-02T10:00:00"
        }]);
        let items = normalize_material_list(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].roteiro.falas, vec!["Bom dia, turma!".to_string()]);
        assert!(items[0].created_at.is_some());
    }

    #[test]
    fn test_material_list_envelope() {
        let raw = json!({"items": [{"id": "m1"}, {"id": "m2"}]});
        let items = normalize_material_list(&raw);
        assert_eq!(items.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), vec!["m1", "m2"]);
        assert_eq!(items[0].source, UNKNOWN_SOURCE);
    }

    #[test]
    fn test_generated_material_envelope_and_flat() {
        let wrapped = json!({
            "material": {"recomendacoes": "r", "roteiro": "1) Abertura", "resumo": "Ao final"},
            "source": "fallback"
        });
        let generated = normalize_generated_material(&wrapped);
        assert_eq!(generated.source, "fallback");
        assert_eq!(generated.roteiro.falas, vec!["1) Abertura".to_string()]);
        assert_eq!(generated.resumo.texto, "Ao final");

        let flat = json!({
            "roteiro": {"falas": ["a", "b"], "exemplos": ["e"]},
            "resumo": {"texto": "t", "exemplo": "x"},
            "source": "openai"
        });
        let generated = normalize_generated_material(&flat);
        assert_eq!(generated.source, "openai");
        assert_eq!(generated.roteiro.falas.len(), 2);
        assert_eq!(generated.roteiro.exemplos, vec!["e".to_string()]);
    }

    #[test]
    fn test_performance_drops_unknown_and_duplicate_tags() {
        let raw = json!({
            "material_util": "muito_util",
            "observacoes": null,
            "alunos": [
                {"aluno_id": 12, "desempenho": ["atento", "sonolento", "atento", "focado"]},
                {"desempenho": ["focado"]},
                {"aluno_id": "s2", "desempenho": "atento"}
            ]
        });
        let record = normalize_performance(&raw, "a1").unwrap();
        assert_eq!(record.aula_id, "a1");
        assert_eq!(record.material_util, Some(MaterialUsefulness::MuitoUtil));
        assert_eq!(record.observacoes, "");
        assert_eq!(record.alunos.len(), 2);
        assert_eq!(record.tags_for("12"), &[PerformanceTag::Atento, PerformanceTag::Focado]);
        assert!(record.tags_for("s2").is_empty());
    }

    #[test]
    fn test_performance_legacy_camel_case() {
        let raw = json!({
            "materialUtil": "pouco_util",
            "observacoes": "agitados",
            "alunos": [{"alunoId": "s1", "desempenho": ["disperso"]}]
        });
        let record = normalize_performance(&raw, "a1").unwrap();
        assert_eq!(record.material_util, Some(MaterialUsefulness::PoucoUtil));
        assert_eq!(record.tags_for("s1"), &[PerformanceTag::Disperso]);
    }

    #[test]
    fn test_performance_null_is_none() {
        assert!(normalize_performance(&Value::Null, "a1").is_none());
    }
}
