mod admin;
mod config;
mod db;
mod diagnostic;
mod errors;
mod insights;
mod llm_client;
mod models;
mod notify;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::diagnostic::question_bank::{question_bank, validate_bank};
use crate::diagnostic::store::PgAssessmentStore;
use crate::insights::{InsightGenerator, LlmInsightGenerator, StaticInsightGenerator};
use crate::llm_client::LlmClient;
use crate::notify::{EmailNotifier, NoopNotifier, Notifier};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CAD Diagnostic API v{}", env!("CARGO_PKG_VERSION"));

    // Refuse to serve a malformed question bank
    validate_bank(question_bank()).context("Question bank failed validation")?;
    info!("Question bank loaded: {} questions", question_bank().len());

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgAssessmentStore::new(db));

    // Initialize insight generator (static fallbacks when no LLM key is configured)
    let insights: Arc<dyn InsightGenerator> = match &config.anthropic_api_key {
        Some(api_key) => {
            let llm = LlmClient::new(api_key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmInsightGenerator(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; insights will use static fallbacks");
            Arc::new(StaticInsightGenerator)
        }
    };

    // Initialize completion notifier
    let notifier: Arc<dyn Notifier> = match &config.mail {
        Some(mail) => {
            info!("Completion notices will be sent to {}", mail.to);
            Arc::new(EmailNotifier::new(
                mail.api_key.clone(),
                mail.from.clone(),
                mail.to.clone(),
            )?)
        }
        None => {
            warn!("RESEND_API_KEY not set; completion notices are disabled");
            Arc::new(NoopNotifier)
        }
    };

    if config.admin_api_key.is_none() {
        warn!("ADMIN_API_KEY not set; admin endpoints will refuse all requests");
    }

    // Build app state
    let state = AppState {
        store,
        insights,
        notifier,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the web app's origin once it is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
