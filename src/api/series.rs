//! Series management REST endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::warn;

use crate::AppState;
use crate::db::{CreateSeries, SeriesRecord};

#[derive(Debug, Deserialize)]
pub struct AddSeriesRequest {
    pub title: String,
    pub tvdb_id: Option<i64>,
    pub banner_url: Option<String>,
    pub path: Option<String>,
    #[serde(default = "default_monitored")]
    pub monitored: bool,
}

fn default_monitored() -> bool {
    true
}

/// List all series
async fn list_series(
    State(state): State<AppState>,
) -> Result<Json<Vec<SeriesRecord>>, StatusCode> {
    match state.db.series().list_all().await {
        Ok(series) => Ok(Json(series)),
        Err(e) => {
            warn!("Failed to list series: {e:#}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific series by id
async fn get_series(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SeriesRecord>, StatusCode> {
    match state.db.series().get_by_id(id).await {
        Ok(Some(series)) => Ok(Json(series)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            warn!("Failed to fetch series {id}: {e:#}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Add a series to the library
async fn add_series(
    State(state): State<AppState>,
    Json(request): Json<AddSeriesRequest>,
) -> Result<(StatusCode, Json<SeriesRecord>), StatusCode> {
    let series = state
        .db
        .series()
        .insert(CreateSeries {
            tvdb_id: request.tvdb_id,
            title: request.title,
            banner_url: request.banner_url,
            path: request.path,
            monitored: request.monitored,
        })
        .await
        .map_err(|e| {
            warn!("Failed to add series: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if state.webhooks.is_configured() {
        let payload = state.webhooks.series_added_payload(&series, "manual");
        if let Err(e) = state.webhooks.send(&payload).await {
            warn!(series_id = series.id, error = %e, "Webhook delivery failed");
        }
    }

    Ok((StatusCode::CREATED, Json(series)))
}

/// Remove a series from the library
async fn delete_series(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let series = state
        .db
        .series()
        .get_by_id(id)
        .await
        .map_err(|e| {
            warn!("Failed to fetch series {id}: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    state.db.series().delete(id).await.map_err(|e| {
        warn!("Failed to delete series {id}: {e:#}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if state.webhooks.is_configured() {
        // Library rows only; no files are removed by this endpoint
        let payload = state.webhooks.series_delete_payload(&series, false, None);
        if let Err(e) = state.webhooks.send(&payload).await {
            warn!(series_id = id, error = %e, "Webhook delivery failed");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/series", get(list_series).post(add_series))
        .route("/series/{id}", get(get_series).delete(delete_series))
}
