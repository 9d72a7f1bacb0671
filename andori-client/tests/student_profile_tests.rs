//! Student screen controller tests

mod helpers;

use andori_client::views::{LoadState, StudentProfileController, ViewError};
use andori_client::LegacyStore;
use andori_client::legacy_store::performance_key;
use andori_common::avatar::STUDENT_PAGE_IMAGES;
use andori_common::events::{AndoriEvent, EventBus};
use andori_common::models::{PerformanceRecord, StudentPerformance};
use andori_common::{MaterialUsefulness, PerformanceTag};
use axum::extract::{Json, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use helpers::{client_for, hits, recorded};
use serde_json::{json, Value};
use tempfile::TempDir;

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found"})))
}

fn backend(performance_status: StatusCode) -> Router {
    Router::new()
        .route(
            "/students/:id",
            get(|Path(id): Path<String>| async move {
                Json(json!({
                    "student_profile": {
                        "id": id,
                        "nome": "Ana",
                        "turma_id": 3,
                        "turma_nome": "5º A",
                        "descricao_do_aluno": "Gosta de desenhar"
                    }
                }))
            }),
        )
        .route(
            "/aulas",
            get(|| async {
                Json(json!([
                    {"id": "a1", "titulo": "Frações", "turma_id": "3", "data": "2024-03-01"},
                    {"id": "a2", "titulo": "Decimais", "turma_id": "3", "data": "2024-03-08"},
                    {"id": "a3", "titulo": "Outra turma", "turma_id": "4", "data": "2024-03-09"}
                ]))
            }),
        )
        .route(
            "/feedback/performance/:id",
            get(move |Path(id): Path<String>| async move {
                if id == "a1" && performance_status == StatusCode::OK {
                    Json(json!({
                        "arrmd_id": "a1",
                        "alunos": [{"aluno_id": "7", "desempenho": ["atento", "focado"]}]
                    }))
                    .into_response()
                } else if performance_status == StatusCode::OK {
                    not_found().into_response()
                } else {
                    (performance_status, "unavailable").into_response()
                }
            }),
        )
        .route("/recomendation", get(|| async { not_found() }))
}

#[tokio::test]
async fn test_profile_loads_class_lessons_and_chart() {
    let client = client_for(backend(StatusCode::OK)).await;
    let events = EventBus::default();
    let mut rx = events.subscribe();
    let controller = StudentProfileController::new(client, events);

    controller.open("7").await.unwrap();
    let state = controller.state().await;

    assert_eq!(state.profile.loaded().unwrap().nome, "Ana");
    assert_eq!(state.turma_label(), "Turma 5º A");
    assert_eq!(state.descricao, "Gosta de desenhar");
    assert!(STUDENT_PAGE_IMAGES.contains(&state.avatar()));

    let lessons = state.lessons.loaded().unwrap();
    let ids: Vec<&str> = lessons.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2"]);
    assert_eq!(state.performance.len(), 1);

    let chart = state.chart();
    assert_eq!(chart.len(), 1);
    assert_eq!(chart[0].aula_id, "a1");
    assert_eq!(chart[0].value, 3.5);

    let counts = state.tag_counts();
    assert_eq!(counts[0], (PerformanceTag::Disperso, 0));
    assert_eq!(counts[2], (PerformanceTag::Atento, 1));
    assert_eq!(counts[3], (PerformanceTag::Focado, 1));

    assert_eq!(
        state.recommendation.error(),
        Some("Recomendações ainda não foram geradas.")
    );

    let mut loaded = false;
    let mut recommendation_present = None;
    while let Ok(event) = rx.try_recv() {
        match event {
            AndoriEvent::StudentProfileLoaded { aluno_id, .. } => {
                assert_eq!(aluno_id, "7");
                loaded = true;
            }
            AndoriEvent::RecommendationLoaded { present, .. } => {
                recommendation_present = Some(present)
            }
            _ => {}
        }
    }
    assert!(loaded);
    assert_eq!(recommendation_present, Some(false));
}

#[tokio::test]
async fn test_missing_student() {
    let client = client_for(Router::new().route("/students/:id", get(|| async { not_found() }))).await;
    let controller = StudentProfileController::new(client, EventBus::default());

    let err = controller.open("404").await.unwrap_err();
    assert_eq!(err.user_message(), "Aluno não encontrado.");
    let state = controller.state().await;
    assert_eq!(state.profile.error(), Some("Aluno não encontrado."));
    assert_eq!(state.lessons, LoadState::Idle);
}

#[tokio::test]
async fn test_local_performance_snapshot_used_without_database() {
    let dir = TempDir::new().unwrap();
    let store = LegacyStore::new(dir.path());
    store
        .put(
            &performance_key("a2"),
            &PerformanceRecord {
                aula_id: "a2".to_string(),
                alunos: vec![StudentPerformance {
                    aluno_id: "7".to_string(),
                    desempenho: vec![PerformanceTag::Disperso],
                }],
                ..PerformanceRecord::default()
            },
        )
        .await
        .unwrap();

    let client = client_for(backend(StatusCode::SERVICE_UNAVAILABLE)).await;
    let controller =
        StudentProfileController::new(client, EventBus::default()).with_legacy_store(store);
    controller.open("7").await.unwrap();

    let state = controller.state().await;
    let chart = state.chart();
    assert_eq!(chart.len(), 1);
    assert_eq!(chart[0].aula_id, "a2");
    assert_eq!(chart[0].value, 1.0);
}

#[tokio::test]
async fn test_camel_case_snapshot_used_without_database() {
    let dir = TempDir::new().unwrap();
    let store = LegacyStore::new(dir.path());
    store
        .put(
            &performance_key("a2"),
            &json!({
                "materialUtil": "util",
                "observacoes": "x",
                "alunos": [{"alunoId": "7", "desempenho": ["disperso"]}]
            }),
        )
        .await
        .unwrap();

    let client = client_for(backend(StatusCode::SERVICE_UNAVAILABLE)).await;
    let controller =
        StudentProfileController::new(client, EventBus::default()).with_legacy_store(store);
    controller.open("7").await.unwrap();

    let state = controller.state().await;
    let record = &state.performance["a2"];
    assert_eq!(record.aula_id, "a2");
    assert_eq!(record.material_util, Some(MaterialUsefulness::Util));
    assert_eq!(record.tags_for("7"), &[PerformanceTag::Disperso]);

    let chart = state.chart();
    assert_eq!(chart.len(), 1);
    assert_eq!(chart[0].aula_id, "a2");
    assert_eq!(chart[0].value, 1.0);
}

#[tokio::test]
async fn test_save_description() {
    let seen = hits();
    let route_hits = seen.clone();
    let client = client_for(backend(StatusCode::OK).route(
        "/description/",
        post(move |Json(body): Json<Value>| {
            let route_hits = route_hits.clone();
            async move {
                route_hits.lock().unwrap().push(body.to_string());
                Json(body)
            }
        }),
    ))
    .await;
    let controller = StudentProfileController::new(client, EventBus::default());
    controller.open("7").await.unwrap();

    let err = controller.save_description("   ").await.unwrap_err();
    assert!(matches!(err, ViewError::Invalid(_)));
    assert_eq!(
        err.user_message(),
        "Descreva como esse aluno se comporta para salvar."
    );
    assert!(recorded(&seen).is_empty());

    let saved = controller
        .save_description("  Prefere atividades em dupla ")
        .await
        .unwrap();
    assert_eq!(saved, "Prefere atividades em dupla");

    let state = controller.state().await;
    assert_eq!(state.descricao, "Prefere atividades em dupla");
    assert_eq!(state.description_error, None);
    assert!(!state.saving_description);

    let sent: Value = serde_json::from_str(&recorded(&seen)[0]).unwrap();
    assert_eq!(sent["aluno_id"], "7");
    assert_eq!(sent["descricao"], "Prefere atividades em dupla");
}
