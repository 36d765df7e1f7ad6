//! Best-effort notification when a new assessment result is produced.
//!
//! The payload carries only who completed the assessment, never the scores.
//! Dispatch is detached from the request: failures are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const EMAIL_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail API rejected the message (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionNotice {
    pub display_name: String,
    pub email: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError>;
}

/// Used when no mail API key is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError> {
        debug!("Notifications disabled; skipping notice for {}", notice.email);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct EmailMessage<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

/// Sends a plain notice through a Resend-compatible transactional mail API.
pub struct EmailNotifier {
    client: Client,
    api_key: String,
    from: String,
    to: String,
}

impl EmailNotifier {
    pub fn new(api_key: String, from: String, to: String) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            api_key,
            from,
            to,
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError> {
        let message = EmailMessage {
            from: &self.from,
            to: [self.to.as_str()],
            subject: format!("New CAD Diagnostic completed by {}", notice.display_name),
            html: render_notice_html(notice),
        };

        let response = self
            .client
            .post(EMAIL_API_URL)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        info!("Completion notice sent for {}", notice.email);
        Ok(())
    }
}

fn render_notice_html(notice: &CompletionNotice) -> String {
    format!(
        "<p>A new CAD Diagnostic assessment was completed.</p>\
         <p><strong>Name:</strong> {}<br><strong>Email:</strong> {}</p>",
        escape_html(&notice.display_name),
        escape_html(&notice.email)
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Spawns the notification and returns immediately. The handle is only
/// awaited in tests.
pub fn dispatch_best_effort(notifier: Arc<dyn Notifier>, notice: CompletionNotice) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&notice).await {
            warn!("Completion notice for {} failed: {e}", notice.email);
        }
    })
}
