use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
///
/// Collaborators are optional: without `ANTHROPIC_API_KEY` insights use the
/// static fallbacks, without `RESEND_API_KEY` notifications are skipped, and
/// without `ADMIN_API_KEY` the admin endpoints answer 403.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: Option<String>,
    pub mail: Option<MailConfig>,
    pub admin_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub api_key: String,
    pub from: String,
    pub to: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mail = match optional("RESEND_API_KEY") {
            Some(api_key) => Some(MailConfig {
                api_key,
                from: optional("NOTIFY_FROM")
                    .context("NOTIFY_FROM must be set when RESEND_API_KEY is set")?,
                to: optional("NOTIFY_TO")
                    .context("NOTIFY_TO must be set when RESEND_API_KEY is set")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: optional("DATABASE_URL")
                .context("Required environment variable 'DATABASE_URL' is not set")?,
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            mail,
            admin_api_key: optional("ADMIN_API_KEY"),
            port: optional("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
