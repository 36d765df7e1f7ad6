//! Assessment persistence.
//!
//! Rows are written once per completed submission and never updated.
//! `AppState` carries an `Arc<dyn AssessmentStore>`; production uses
//! `PgAssessmentStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::diagnostic::models::{CadAssessmentResult, Response};
use crate::errors::AppError;
use crate::insights::{Insight, InsightSource};
use crate::models::assessment::AssessmentRow;

/// Everything recorded for one completed assessment.
pub struct NewAssessment<'a> {
    pub user_id: Uuid,
    pub display_name: Option<&'a str>,
    pub responses: &'a [Response],
    pub result: &'a CadAssessmentResult,
    pub insight: &'a Insight,
    pub insight_source: InsightSource,
    pub completed_at: DateTime<Utc>,
}

impl NewAssessment<'_> {
    /// Flattens the record into a row with a fresh id.
    pub fn into_row(self) -> Result<AssessmentRow, AppError> {
        let to_json = |what: &str, value: Result<serde_json::Value, serde_json::Error>| {
            value.map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {what}: {e}")))
        };
        Ok(AssessmentRow {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            display_name: self.display_name.map(str::to_string),
            dominant_quadrant: i16::from(self.result.dominant_quadrant.value()),
            strategic_pathway: self.result.strategic_pathway.label().to_string(),
            readiness_for_q4: self.result.readiness_for_q4,
            responses: to_json("responses", serde_json::to_value(self.responses))?,
            result: to_json("result", serde_json::to_value(self.result))?,
            insight: to_json("insight", serde_json::to_value(self.insight))?,
            insight_source: self.insight_source.as_str().to_string(),
            completed_at: self.completed_at,
        })
    }
}

/// Aggregates over every stored assessment, grouped the way the admin
/// console reports them. Keys are raw column values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortStats {
    pub total: i64,
    /// `None` when there are no rows.
    pub average_readiness: Option<f64>,
    pub fallback_insights: i64,
    pub by_quadrant: Vec<(i16, i64)>,
    pub by_pathway: Vec<(String, i64)>,
}

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn insert(&self, record: NewAssessment<'_>) -> Result<AssessmentRow, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<AssessmentRow>, AppError>;

    /// Most recent assessment for the user, by `completed_at`.
    async fn latest_for_user(&self, user_id: Uuid) -> Result<Option<AssessmentRow>, AppError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AssessmentRow>, AppError>;

    /// Newest first, across all users.
    async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<AssessmentRow>, AppError>;

    async fn cohort_stats(&self) -> Result<CohortStats, AppError>;
}

pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn insert(&self, record: NewAssessment<'_>) -> Result<AssessmentRow, AppError> {
        let row = record.into_row()?;

        sqlx::query(
            r#"
            INSERT INTO assessments
                (id, user_id, display_name, dominant_quadrant, strategic_pathway,
                 readiness_for_q4, responses, result, insight, insight_source, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(&row.display_name)
        .bind(row.dominant_quadrant)
        .bind(&row.strategic_pathway)
        .bind(row.readiness_for_q4)
        .bind(&row.responses)
        .bind(&row.result)
        .bind(&row.insight)
        .bind(&row.insight_source)
        .bind(row.completed_at)
        .execute(&self.pool)
        .await?;

        info!("Stored assessment {} for user {}", row.id, row.user_id);
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<AssessmentRow>, AppError> {
        Ok(
            sqlx::query_as::<_, AssessmentRow>("SELECT * FROM assessments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn latest_for_user(&self, user_id: Uuid) -> Result<Option<AssessmentRow>, AppError> {
        Ok(sqlx::query_as::<_, AssessmentRow>(
            "SELECT * FROM assessments WHERE user_id = $1 ORDER BY completed_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AssessmentRow>, AppError> {
        Ok(sqlx::query_as::<_, AssessmentRow>(
            "SELECT * FROM assessments WHERE user_id = $1 ORDER BY completed_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<AssessmentRow>, AppError> {
        Ok(sqlx::query_as::<_, AssessmentRow>(
            "SELECT * FROM assessments ORDER BY completed_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn cohort_stats(&self) -> Result<CohortStats, AppError> {
        let (total, average_readiness, fallback_insights): (i64, Option<f64>, i64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       AVG(readiness_for_q4),
                       COUNT(*) FILTER (WHERE insight_source = 'fallback')
                FROM assessments
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let by_quadrant: Vec<(i16, i64)> = sqlx::query_as(
            "SELECT dominant_quadrant, COUNT(*) FROM assessments GROUP BY dominant_quadrant ORDER BY dominant_quadrant",
        )
        .fetch_all(&self.pool)
        .await?;

        let by_pathway: Vec<(String, i64)> = sqlx::query_as(
            "SELECT strategic_pathway, COUNT(*) FROM assessments GROUP BY strategic_pathway ORDER BY strategic_pathway",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(CohortStats {
            total,
            average_readiness,
            fallback_insights,
            by_quadrant,
            by_pathway,
        })
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::BTreeMap;

    use tokio::sync::RwLock;

    use super::*;

    /// Vec-backed store for handler tests.
    #[derive(Default)]
    pub struct InMemoryAssessmentStore {
        pub rows: RwLock<Vec<AssessmentRow>>,
    }

    fn newest_first(mut rows: Vec<AssessmentRow>) -> Vec<AssessmentRow> {
        rows.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows
    }

    #[async_trait]
    impl AssessmentStore for InMemoryAssessmentStore {
        async fn insert(&self, record: NewAssessment<'_>) -> Result<AssessmentRow, AppError> {
            let row = record.into_row()?;
            self.rows.write().await.push(row.clone());
            Ok(row)
        }

        async fn get(&self, id: Uuid) -> Result<Option<AssessmentRow>, AppError> {
            Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
        }

        async fn latest_for_user(
            &self,
            user_id: Uuid,
        ) -> Result<Option<AssessmentRow>, AppError> {
            Ok(self.list_for_user(user_id).await?.into_iter().next())
        }

        async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AssessmentRow>, AppError> {
            let rows = self.rows.read().await;
            Ok(newest_first(
                rows.iter().filter(|r| r.user_id == user_id).cloned().collect(),
            ))
        }

        async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<AssessmentRow>, AppError> {
            let rows = newest_first(self.rows.read().await.clone());
            Ok(rows
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect())
        }

        async fn cohort_stats(&self) -> Result<CohortStats, AppError> {
            let rows = self.rows.read().await;
            let mut by_quadrant: BTreeMap<i16, i64> = BTreeMap::new();
            let mut by_pathway: BTreeMap<String, i64> = BTreeMap::new();
            for row in rows.iter() {
                *by_quadrant.entry(row.dominant_quadrant).or_insert(0) += 1;
                *by_pathway.entry(row.strategic_pathway.clone()).or_insert(0) += 1;
            }
            let total = rows.len() as i64;
            Ok(CohortStats {
                total,
                average_readiness: (total > 0).then(|| {
                    rows.iter().map(|r| r.readiness_for_q4).sum::<f64>() / total as f64
                }),
                fallback_insights: rows
                    .iter()
                    .filter(|r| r.insight_source == InsightSource::Fallback.as_str())
                    .count() as i64,
                by_quadrant: by_quadrant.into_iter().collect(),
                by_pathway: by_pathway.into_iter().collect(),
            })
        }
    }
}
