use axum::Json;
use serde_json::{json, Value};

use crate::diagnostic::question_bank::question_bank;

/// GET /health
/// Returns service status, version, and the size of the loaded question bank.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cad-diagnostic-api",
        "questions": question_bank().len()
    }))
}
