//! Integration tests for view-model normalization and derived values
//!
//! Covers the lesson precedence rules across the payload shapes seen from
//! the backend, performance averaging for the student chart, avatar
//! stability and the offline generator's keyword mapping.

use andori_common::avatar::{pool_index, select_profile_avatar, PROFILE_AVATAR_IMAGES};
use andori_common::lesson_material::{generate_lesson_material, LessonRequest};
use andori_common::models::{Aula, PerformanceRecord};
use andori_common::normalize::{
    lesson_belongs_to_class, normalize_aula, normalize_performance, unwrap_envelope,
};
use andori_common::performance::{average_score, chart_series, PerformanceTag};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Lesson payloads where only the upload blob carries the class id
fn upload_only_payloads(turma_id: &str) -> Vec<Value> {
    let blob = json!({ "turma_id": turma_id, "turma": "5º A", "data": "2024-04-02" });
    vec![
        json!({ "id": "a1", "assunto": "Frações", "upload_arquivo": blob.to_string() }),
        json!({ "id": "a1", "assunto": "Frações", "upload_arquivo": blob.clone() }),
        json!({ "id": "a1", "titulo": "Frações", "turma_id": null, "upload_arquivo": blob.to_string() }),
        json!({ "id": "a1", "turma_id": "", "upload_arquivo": blob }),
    ]
}

#[test]
fn test_normalizing_a_normalized_lesson_is_a_no_op() {
    let payloads = vec![
        (
            json!({
                "assunto": "Frações",
                "turma_id": "",
                "upload_arquivo": json!({"turma_id": "3", "turma": "5º A", "data": "2024-03-01"}).to_string()
            }),
            Some("10"),
        ),
        (json!({ "titulo": "Sistema solar" }), Some("42")),
        (
            json!({
                "id": 7,
                "titulo": "Relevo",
                "turma": "6º B",
                "turma_nome": "6º B",
                "data": "2024-04-02",
                "arquivo": {"nome": "mapa.pdf"},
                "upload_arquivo": "mapa.pdf"
            }),
            None,
        ),
    ];

    for (raw, fallback_id) in payloads {
        let aula = normalize_aula(&raw, fallback_id);
        let again = normalize_aula(&serde_json::to_value(&aula).unwrap(), fallback_id);
        assert_eq!(again, aula, "payload {}", raw);
        let fresh = normalize_aula(&serde_json::to_value(&aula).unwrap(), None);
        assert_eq!(fresh, aula, "payload {} without fallback", raw);
    }
}

#[test]
fn test_upload_turma_id_is_exposed_unchanged() {
    for turma_id in ["7", "c0a8e1f2-4b1d-4c55-9a31-1f6e2d3b4a5c", "turma 5 A"] {
        for payload in upload_only_payloads(turma_id) {
            let aula = normalize_aula(&payload, None);
            assert_eq!(aula.turma_id.as_deref(), Some(turma_id), "payload: {}", payload);
        }
    }
}

#[test]
fn test_top_level_assunto_wins_over_upload() {
    let cases = [
        ("Frações", "Decimais"),
        ("Revolução Francesa", "Idade Média"),
        ("", "Vazio no topo"),
    ];
    for (top, nested) in cases {
        let blob = json!({ "assunto": nested, "titulo": nested });
        for upload in [blob.clone(), Value::String(blob.to_string())] {
            let payload = json!({ "id": "a1", "assunto": top, "upload_arquivo": upload });
            let aula = normalize_aula(&payload, None);
            assert_eq!(aula.assunto, top);
            assert_eq!(aula.titulo, top);
        }
    }
}

#[test]
fn test_both_envelope_shapes() {
    let bare = json!({ "id": "a9", "assunto": "Ecossistemas", "turma": "6º B" });
    let wrapped = json!({ "aula": bare.clone() });

    let from_bare = normalize_aula(&unwrap_envelope(bare, "aula"), None);
    let from_wrapped = normalize_aula(&unwrap_envelope(wrapped, "aula"), None);
    assert_eq!(from_bare, from_wrapped);
    assert_eq!(from_bare.turma, "6º B");
}

#[test]
fn test_fallback_id_and_defaults() {
    let aula = normalize_aula(&json!({}), Some("a42"));
    assert_eq!(aula.id, "a42");
    assert_eq!(aula.assunto, "Aula sem título");
    assert_eq!(aula.turma, "Turma não informada");
    assert_eq!(aula.turma_id, None);
    assert!(aula.data.is_empty());
}

#[test]
fn test_class_membership() {
    let aula = normalize_aula(
        &json!({ "id": "a1", "turma": " 5º a ", "turma_id": "t1" }),
        None,
    );
    assert!(lesson_belongs_to_class(&aula, Some("t1"), None));
    assert!(!lesson_belongs_to_class(&aula, Some("t2"), Some("5º A")));

    let by_name = Aula {
        turma: "5º A".to_string(),
        ..Aula::default()
    };
    assert!(lesson_belongs_to_class(&by_name, Some("t1"), Some("5º a")));
    assert!(!lesson_belongs_to_class(&by_name, None, None));
}

#[test]
fn test_average_and_chart_exclusion() {
    assert_eq!(
        average_score(&[PerformanceTag::Atento, PerformanceTag::Focado]),
        Some(3.5)
    );
    assert_eq!(average_score(&[]), None);

    let lessons = vec![
        normalize_aula(&json!({ "id": "a1", "data": "2024-03-01" }), None),
        normalize_aula(&json!({ "id": "a2", "data": "2024-03-08" }), None),
    ];
    let raw = [
        ("a1", json!({ "arrmd_id": "a1", "alunos": [{ "aluno_id": "s1", "desempenho": ["atento", "focado"] }] })),
        ("a2", json!({ "arrmd_id": "a2", "alunos": [{ "aluno_id": "s1", "desempenho": [] }] })),
    ];
    let records: HashMap<String, PerformanceRecord> = raw
        .iter()
        .filter_map(|(id, value)| Some((id.to_string(), normalize_performance(value, id)?)))
        .collect();

    let series = chart_series(&lessons, "s1", &records);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].aula_id, "a1");
    assert_eq!(series[0].value, 3.5);
}

#[test]
fn test_avatar_is_stable_per_identifier() {
    let ids = ["", "a", "aluno-1", "aluno-2", "6f1c2d3e-aaaa-bbbb-cccc-000000000001"];
    for id in ids {
        let first = select_profile_avatar(id);
        for _ in 0..5 {
            assert_eq!(select_profile_avatar(id), first);
        }
        assert!(pool_index(id, PROFILE_AVATAR_IMAGES.len()) < PROFILE_AVATAR_IMAGES.len());
    }
}

#[test]
fn test_generator_keyword_mapping() {
    for assunto in ["Geografia", "geografia física", "AULA DE GEOGRAFIA"] {
        let material = generate_lesson_material(&LessonRequest {
            assunto: assunto.to_string(),
            ..LessonRequest::default()
        });
        assert_eq!(material.persona.hyperfocus, "mapas e lugares do mundo");
    }

    let material = generate_lesson_material(&LessonRequest {
        assunto: "Educação Física".to_string(),
        ..LessonRequest::default()
    });
    assert_eq!(material.persona.hyperfocus, "trens e sistemas de transporte");
}

#[test]
fn test_generator_is_deterministic() {
    let request = LessonRequest {
        assunto: "Sistema Solar".to_string(),
        descricao: "Planetas e órbitas".to_string(),
        turma: "4º C".to_string(),
        data: "2024-06-01".to_string(),
        feedback: Some("mais imagens".to_string()),
        hyperfocus: Some("Minecraft".to_string()),
    };
    let first = generate_lesson_material(&request);
    for _ in 0..3 {
        assert_eq!(generate_lesson_material(&request.clone()), first);
    }
}
