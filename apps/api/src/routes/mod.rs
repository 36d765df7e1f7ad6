pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::admin;
use crate::diagnostic::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Assessment flow
        .route(
            "/api/v1/diagnostic/questions",
            get(handlers::handle_get_questions),
        )
        .route("/api/v1/diagnostic/score", post(handlers::handle_score))
        .route("/api/v1/diagnostic/submit", post(handlers::handle_submit))
        // Dashboard
        .route(
            "/api/v1/diagnostic/results",
            get(handlers::handle_latest_result),
        )
        .route("/api/v1/diagnostic/history", get(handlers::handle_history))
        // Admin console
        .route(
            "/api/v1/admin/assessments",
            get(admin::handle_list_assessments),
        )
        .route(
            "/api/v1/admin/assessments/:id",
            get(admin::handle_get_assessment),
        )
        .route("/api/v1/admin/summary", get(admin::handle_summary))
        .with_state(state)
}

#[cfg(test)]
mod tests;
