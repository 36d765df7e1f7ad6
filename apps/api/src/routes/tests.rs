use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use super::build_router;
use crate::admin::ADMIN_KEY_HEADER;
use crate::config::Config;
use crate::diagnostic::models::QuadrantLevel;
use crate::diagnostic::question_bank::question_bank;
use crate::diagnostic::store::memory::InMemoryAssessmentStore;
use crate::errors::AppError;
use crate::insights::{fallback_insight, Insight, InsightGenerator, InsightRequest};
use crate::models::assessment::AssessmentRow;
use crate::notify::testing::RecordingNotifier;
use crate::state::AppState;

const ADMIN_KEY: &str = "test-admin-key";

struct UnavailableInsights;

#[async_trait]
impl InsightGenerator for UnavailableInsights {
    async fn generate(&self, _request: InsightRequest<'_>) -> Result<Insight, AppError> {
        Err(AppError::Llm("timeout".to_string()))
    }
}

struct Harness {
    app: Router,
    store: Arc<InMemoryAssessmentStore>,
    notifier: Arc<RecordingNotifier>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryAssessmentStore::default());
    let notifier = Arc::new(RecordingNotifier {
        fail: true,
        ..Default::default()
    });
    let state = AppState {
        store: store.clone(),
        insights: Arc::new(UnavailableInsights),
        notifier: notifier.clone(),
        config: Config {
            database_url: "postgres://unused".to_string(),
            anthropic_api_key: None,
            mail: None,
            admin_api_key: Some(ADMIN_KEY.to_string()),
            port: 0,
            rust_log: "debug".to_string(),
        },
    };
    Harness {
        app: build_router(state),
        store,
        notifier,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn admin_get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(ADMIN_KEY_HEADER, ADMIN_KEY)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Answers every question, the first `command_first` at Q3 and the rest at Q1.
fn submission(user_id: Uuid, command_first: usize) -> Value {
    let answers: Vec<Value> = question_bank()
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let quadrant = if i < command_first { 3 } else { 1 };
            json!({ "question_id": q.id, "quadrant": quadrant })
        })
        .collect();
    json!({
        "user_id": user_id,
        "display_name": "Casey",
        "email": "casey@example.com",
        "answers": answers
    })
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, body) = send(&h.app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["questions"], 20);
}

#[tokio::test]
async fn test_questions_lists_bank_with_options() {
    let h = harness();
    let (status, body) = send(&h.app, get("/api/v1/diagnostic/questions")).await;
    assert_eq!(status, StatusCode::OK);
    let questions = body.as_array().unwrap();
    assert_eq!(questions.len(), 20);
    assert_eq!(questions[0]["id"], "capability-1");
    assert_eq!(questions[0]["options"].as_array().unwrap().len(), 4);
    assert_eq!(questions[0]["options"][0]["quadrant"], 2);
    assert_eq!(questions[0]["options"][0]["external_state"], "system");
}

#[tokio::test]
async fn test_score_even_split() {
    let h = harness();
    let responses: Vec<Value> = (0..20)
        .map(|i| {
            let level = QuadrantLevel::ALL[i / 5];
            json!({
                "quadrant": level.value(),
                "internal_state": level.internal_state(),
                "external_state": level.external_state(),
                "pillar": "competence"
            })
        })
        .collect();

    let (status, body) = send(
        &h.app,
        post_json("/api/v1/diagnostic/score", json!({ "responses": responses })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dominant_quadrant"], 1);
    assert_eq!(body["quadrant_counts"], json!({"q1": 5, "q2": 5, "q3": 5, "q4": 5}));
    assert_eq!(body["pillar_scores"]["competence"], 50);
    assert_eq!(body["strategic_pathway"], "Undefined");
    assert_eq!(body["readiness_for_q4"], 62.5);
    assert_eq!(body["total_responses"], 20);
}

#[tokio::test]
async fn test_score_rejects_empty_input() {
    let h = harness();
    let (status, body) = send(
        &h.app,
        post_json("/api/v1/diagnostic/score", json!({ "responses": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_score_rejects_malformed_response() {
    let h = harness();
    let body = json!({ "responses": [{
        "quadrant": 4,
        "internal_state": "awareness",
        "external_state": "system",
        "pillar": "character"
    }]});
    let (status, body) = send(&h.app, post_json("/api/v1/diagnostic/score", body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
}

#[tokio::test]
async fn test_submit_scores_stores_and_falls_back() {
    let h = harness();
    let user_id = Uuid::new_v4();

    let (status, body) = send(
        &h.app,
        post_json("/api/v1/diagnostic/submit", submission(user_id, 12)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["dominant_quadrant"], 3);
    assert_eq!(body["result"]["strategic_pathway"], "Route B: Command-First");
    assert_eq!(body["insight_source"], "fallback");
    assert_eq!(
        body["insight"]["summary"],
        fallback_insight(QuadrantLevel::Q3).summary
    );

    let rows = h.store.rows.read().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, user_id);
    assert_eq!(rows[0].display_name.as_deref(), Some("Casey"));
    assert_eq!(rows[0].id.to_string(), body["assessment_id"]);
}

#[tokio::test]
async fn test_submit_succeeds_when_notifier_fails() {
    let h = harness();
    let (status, _) = send(
        &h.app,
        post_json("/api/v1/diagnostic/submit", submission(Uuid::new_v4(), 0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The notice runs on a detached task; give it a chance to run.
    for _ in 0..50 {
        if !h.notifier.sent.lock().unwrap().is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }
    let sent = h.notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].display_name, "Casey");
    assert_eq!(sent[0].email, "casey@example.com");
}

#[tokio::test]
async fn test_submit_rejects_incomplete_answers() {
    let h = harness();
    let mut body = submission(Uuid::new_v4(), 0);
    body["answers"].as_array_mut().unwrap().pop();

    let (status, body) = send(&h.app, post_json("/api/v1/diagnostic/submit", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("capacity-4"));
    assert!(h.store.rows.read().await.is_empty());
}

#[tokio::test]
async fn test_dashboard_returns_latest_and_history() {
    let h = harness();
    let user_id = Uuid::new_v4();

    let (status, _) = send(
        &h.app,
        get(&format!("/api/v1/diagnostic/results?user_id={user_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &h.app,
        post_json("/api/v1/diagnostic/submit", submission(user_id, 20)),
    )
    .await;

    let (status, body) = send(
        &h.app,
        get(&format!("/api/v1/diagnostic/results?user_id={user_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["dominant_quadrant"], 3);
    assert_eq!(body["responses"].as_array().unwrap().len(), 20);

    let (status, body) = send(
        &h.app,
        get(&format!("/api/v1/diagnostic/history?user_id={user_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_requires_key() {
    let h = harness();
    let (status, body) = send(&h.app, get("/api/v1/admin/summary")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_admin_listing_detail_and_summary() {
    let h = harness();
    for command_first in [0, 20] {
        send(
            &h.app,
            post_json(
                "/api/v1/diagnostic/submit",
                submission(Uuid::new_v4(), command_first),
            ),
        )
        .await;
    }

    let (status, list) = send(&h.app, admin_get("/api/v1/admin/assessments?limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    let id = list[0]["id"].as_str().unwrap();
    let (status, detail) = send(&h.app, admin_get(&format!("/api/v1/admin/assessments/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"], id);

    let (status, _) = send(
        &h.app,
        admin_get(&format!("/api/v1/admin/assessments/{}", Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, summary) = send(&h.app, admin_get("/api/v1/admin/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_assessments"], 2);
    assert_eq!(summary["quadrant_distribution"]["q1"], 1);
    assert_eq!(summary["quadrant_distribution"]["q3"], 1);
    assert_eq!(summary["fallback_insights"], 2);
    // (25 + 75) / 2
    assert_eq!(summary["average_readiness"], 50.0);
}

#[tokio::test]
async fn test_admin_summary_counts_every_stored_assessment() {
    let h = harness();
    send(
        &h.app,
        post_json("/api/v1/diagnostic/submit", submission(Uuid::new_v4(), 20)),
    )
    .await;
    {
        let mut rows = h.store.rows.write().await;
        let template = rows[0].clone();
        rows.extend((0..10_000).map(|_| AssessmentRow {
            id: Uuid::new_v4(),
            ..template.clone()
        }));
    }

    let (status, summary) = send(&h.app, admin_get("/api/v1/admin/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_assessments"], 10_001);
    assert_eq!(summary["quadrant_distribution"]["q3"], 10_001);
    assert_eq!(summary["fallback_insights"], 10_001);
    assert_eq!(summary["average_readiness"], 75.0);
}
