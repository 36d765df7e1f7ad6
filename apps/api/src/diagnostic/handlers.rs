//! Axum route handlers for the assessment flow and the results dashboard.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::diagnostic::models::{CadAssessmentResult, Question, Response};
use crate::diagnostic::question_bank::question_bank;
use crate::diagnostic::scoring::score;
use crate::diagnostic::store::NewAssessment;
use crate::diagnostic::submission::{build_responses, AnswerInput};
use crate::errors::AppError;
use crate::insights::{generate_or_fallback, Insight, InsightRequest, InsightSource};
use crate::models::assessment::AssessmentRow;
use crate::notify::{dispatch_best_effort, CompletionNotice};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub responses: Vec<Response>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    /// Only used for the completion notice; not stored.
    pub email: Option<String>,
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub assessment_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub result: CadAssessmentResult,
    pub insight: Insight,
    pub insight_source: InsightSource,
}

/// A stored assessment decoded back into typed parts.
#[derive(Debug, Serialize)]
pub struct AssessmentView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub responses: Vec<Response>,
    pub result: CadAssessmentResult,
    pub insight: Insight,
    pub insight_source: String,
}

impl TryFrom<AssessmentRow> for AssessmentView {
    type Error = AppError;

    fn try_from(row: AssessmentRow) -> Result<Self, Self::Error> {
        let decode_err = |what: &str, e: serde_json::Error| {
            AppError::Internal(anyhow::anyhow!(
                "Stored assessment {} has an unreadable {what}: {e}",
                row.id
            ))
        };
        Ok(AssessmentView {
            id: row.id,
            user_id: row.user_id,
            display_name: row.display_name.clone(),
            completed_at: row.completed_at,
            responses: serde_json::from_value(row.responses.clone())
                .map_err(|e| decode_err("response list", e))?,
            result: serde_json::from_value(row.result.clone())
                .map_err(|e| decode_err("result", e))?,
            insight: serde_json::from_value(row.insight.clone())
                .map_err(|e| decode_err("insight", e))?,
            insight_source: row.insight_source.clone(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/diagnostic/questions
pub async fn handle_get_questions() -> Json<&'static [Question]> {
    Json(question_bank())
}

/// POST /api/v1/diagnostic/score
///
/// Scores whatever responses are sent (partial sets included). Nothing is stored.
pub async fn handle_score(
    Json(request): Json<ScoreRequest>,
) -> Result<Json<CadAssessmentResult>, AppError> {
    Ok(Json(score(&request.responses)?))
}

/// POST /api/v1/diagnostic/submit
///
/// Complete submission: answers → responses → score → insight → store → notify.
/// The insight falls back to canned text and the notice is fire-and-forget,
/// so neither collaborator can fail the request.
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let responses = build_responses(question_bank(), &request.answers)?;
    let result = score(&responses)?;
    info!(
        "Scored assessment for user {}: {} / {}",
        request.user_id, result.dominant_quadrant, result.strategic_pathway
    );

    let display_name = request
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let (insight, insight_source) = generate_or_fallback(
        state.insights.as_ref(),
        InsightRequest {
            result: &result,
            responses: &responses,
            display_name,
        },
    )
    .await;

    let row = state
        .store
        .insert(NewAssessment {
            user_id: request.user_id,
            display_name,
            responses: &responses,
            result: &result,
            insight: &insight,
            insight_source,
            completed_at: Utc::now(),
        })
        .await?;

    if let Some(email) = request.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        dispatch_best_effort(
            state.notifier.clone(),
            CompletionNotice {
                display_name: display_name.unwrap_or(email).to_string(),
                email: email.to_string(),
            },
        );
    }

    Ok(Json(SubmitResponse {
        assessment_id: row.id,
        completed_at: row.completed_at,
        result,
        insight,
        insight_source,
    }))
}

/// GET /api/v1/diagnostic/results?user_id=
///
/// Latest assessment for the dashboard.
pub async fn handle_latest_result(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AssessmentView>, AppError> {
    let row = state
        .store
        .latest_for_user(params.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No assessment found for user {}", params.user_id))
        })?;
    Ok(Json(AssessmentView::try_from(row)?))
}

/// GET /api/v1/diagnostic/history?user_id=
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<AssessmentView>>, AppError> {
    let rows = state.store.list_for_user(params.user_id).await?;
    let views = rows
        .into_iter()
        .map(AssessmentView::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}
