//! Admin console API: browse stored assessments and view cohort statistics.
//!
//! Guarded by a shared `x-admin-key` header. This is a gate for the console,
//! not user authentication.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::Config;
use crate::diagnostic::handlers::AssessmentView;
use crate::diagnostic::models::{QuadrantCounts, QuadrantLevel, StrategicPathway};
use crate::diagnostic::store::CohortStats;
use crate::errors::AppError;
use crate::models::assessment::AssessmentRow;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";
const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentListItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub dominant_quadrant: i16,
    pub strategic_pathway: String,
    pub readiness_for_q4: f64,
    pub insight_source: String,
    pub completed_at: DateTime<Utc>,
}

impl From<AssessmentRow> for AssessmentListItem {
    fn from(row: AssessmentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            display_name: row.display_name,
            dominant_quadrant: row.dominant_quadrant,
            strategic_pathway: row.strategic_pathway,
            readiness_for_q4: row.readiness_for_q4,
            insight_source: row.insight_source,
            completed_at: row.completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathwayCount {
    pub pathway: StrategicPathway,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub total_assessments: u32,
    pub quadrant_distribution: QuadrantCounts,
    pub pathway_distribution: Vec<PathwayCount>,
    /// Mean of stored readiness scores; 0 when there are none.
    pub average_readiness: f64,
    pub fallback_insights: u32,
}

fn to_count(n: i64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Builds the cohort report from store aggregates. Groups with an
/// unrecognised quadrant or pathway are logged and left out of that
/// distribution only.
pub fn summarize_cohort(stats: &CohortStats) -> CohortSummary {
    let mut quadrant_distribution = QuadrantCounts::default();
    for &(quadrant, n) in &stats.by_quadrant {
        match u8::try_from(quadrant)
            .ok()
            .and_then(|q| QuadrantLevel::try_from(q).ok())
        {
            Some(level) => quadrant_distribution.add(level, to_count(n)),
            None => warn!("{n} assessment(s) have invalid dominant quadrant {quadrant}"),
        }
    }

    let mut pathway_distribution: Vec<PathwayCount> = StrategicPathway::ALL
        .iter()
        .map(|&pathway| PathwayCount { pathway, count: 0 })
        .collect();
    for (label, n) in &stats.by_pathway {
        let slot = match StrategicPathway::from_label(label) {
            Some(pathway) => pathway_distribution.iter_mut().find(|c| c.pathway == pathway),
            None => None,
        };
        match slot {
            Some(slot) => slot.count += to_count(*n),
            None => warn!("{n} assessment(s) have unknown pathway '{label}'"),
        }
    }

    let total_assessments = to_count(stats.total);
    let classified = quadrant_distribution.total();
    if classified < total_assessments {
        warn!(
            "Cohort summary: {} of {total_assessments} assessments have no recognised quadrant",
            total_assessments - classified
        );
    }

    CohortSummary {
        total_assessments,
        quadrant_distribution,
        pathway_distribution,
        average_readiness: stats.average_readiness.unwrap_or(0.0),
        fallback_insights: to_count(stats.fallback_insights),
    }
}

/// Compares without short-circuiting on the first differing byte.
fn keys_match(provided: &str, expected: &str) -> bool {
    let (provided, expected) = (provided.as_bytes(), expected.as_bytes());
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

fn require_admin(headers: &HeaderMap, config: &Config) -> Result<(), AppError> {
    let expected = config.admin_api_key.as_deref().ok_or(AppError::Forbidden)?;
    let provided = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    if !keys_match(provided, expected) {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/assessments?limit=&offset=
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<AssessmentListItem>>, AppError> {
    require_admin(&headers, &state.config)?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let rows = state.store.list_all(limit, offset).await?;
    Ok(Json(rows.into_iter().map(AssessmentListItem::from).collect()))
}

/// GET /api/v1/admin/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentView>, AppError> {
    require_admin(&headers, &state.config)?;
    let row = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment {id} not found")))?;
    Ok(Json(AssessmentView::try_from(row)?))
}

/// GET /api/v1/admin/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CohortSummary>, AppError> {
    require_admin(&headers, &state.config)?;
    let stats = state.store.cohort_stats().await?;
    Ok(Json(summarize_cohort(&stats)))
}
