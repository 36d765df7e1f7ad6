use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One completed assessment as stored in the `assessments` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub dominant_quadrant: i16,
    pub strategic_pathway: String,
    pub readiness_for_q4: f64,
    pub responses: Value,
    pub result: Value,
    pub insight: Value,
    pub insight_source: String,
    pub completed_at: DateTime<Utc>,
}
