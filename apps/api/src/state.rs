use std::sync::Arc;

use crate::config::Config;
use crate::diagnostic::store::AssessmentStore;
use crate::insights::InsightGenerator;
use crate::notify::Notifier;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Collaborators are built once in `main` and held for the process lifetime.
/// The scoring engine itself takes none of them.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AssessmentStore>,
    /// LLM-backed by default; static fallbacks when no API key is configured.
    pub insights: Arc<dyn InsightGenerator>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Config,
}
