//! Application configuration management

use std::env;

use anyhow::{Context, Result};
use url::Url;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// SQLite database path or sqlite:// URL
    pub database_url: String,

    /// Directory where series banners are written
    pub banner_path: String,

    /// Instance name included in outbound webhook payloads
    pub instance_name: String,

    /// Optional webhook endpoint for outbound event notifications
    pub webhook_url: Option<Url>,

    /// Whether to start the cron scheduler (disable for one-shot tooling)
    pub enable_scheduler: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Prefer DATABASE_PATH, fall back to DATABASE_URL
        let database_url = env::var("DATABASE_PATH")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "./data/showkeeper.db".to_string());

        let webhook_url = match env::var("WEBHOOK_URL") {
            Ok(raw) => Some(Url::parse(&raw).context("Invalid WEBHOOK_URL")?),
            Err(_) => None,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            banner_path: env::var("BANNER_PATH").unwrap_or_else(|_| "./data/banners".to_string()),

            instance_name: env::var("INSTANCE_NAME").unwrap_or_else(|_| "Showkeeper".to_string()),

            webhook_url,

            enable_scheduler: env::var("ENABLE_SCHEDULER")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        })
    }
}
