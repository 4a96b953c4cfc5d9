//! Showkeeper Backend - series manager with automatic banner sync
//!
//! REST endpoints live under /api; health probes at /healthz and /readyz.

pub mod api;
pub mod config;
pub mod db;
pub mod jobs;
pub mod services;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::jobs::banner_sync::BannerSyncJob;
use crate::services::{ProgressTracker, WebhookSender};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub banner_job: Arc<BannerSyncJob>,
    pub progress: Arc<ProgressTracker>,
    pub webhooks: Arc<WebhookSender>,
}
