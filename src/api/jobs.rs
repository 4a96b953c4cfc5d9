//! Job trigger and progress REST endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use tracing::error;

use crate::AppState;
use crate::jobs::banner_sync::SyncSummary;
use crate::services::progress::{ProgressNotification, ProgressSnapshot};

/// Trigger a full banner sync and return the run summary
async fn trigger_banner_sync(
    State(state): State<AppState>,
) -> Result<Json<SyncSummary>, StatusCode> {
    let notification = Arc::new(ProgressNotification::new("Banner Download"));
    state.progress.begin(notification.clone());

    match state.banner_job.run_all(&notification).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            error!("Banner sync failed: {e:#}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Trigger a banner sync for a single series
async fn trigger_banner_sync_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SyncSummary>, StatusCode> {
    let notification = Arc::new(ProgressNotification::new("Banner Download"));
    state.progress.begin(notification.clone());

    match state.banner_job.run_one(&notification, id).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            error!(series_id = id, "Banner sync failed: {e:#}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Snapshot of the most recent job run, if any
async fn job_progress(State(state): State<AppState>) -> Json<Option<ProgressSnapshot>> {
    Json(state.progress.snapshot())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs/banner-sync", post(trigger_banner_sync))
        .route("/jobs/banner-sync/{id}", post(trigger_banner_sync_one))
        .route("/jobs/progress", get(job_progress))
}
