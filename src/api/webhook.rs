//! Webhook connection test endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Serialize;

use crate::AppState;
use crate::services::WebhookError;

#[derive(Serialize)]
pub struct WebhookTestResponse {
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Send a placeholder grab payload to the configured webhook URL
async fn test_webhook(
    State(state): State<AppState>,
) -> Result<Json<WebhookTestResponse>, StatusCode> {
    let payload = state.webhooks.test_payload();

    match state.webhooks.send(&payload).await {
        Ok(()) => Ok(Json(WebhookTestResponse {
            delivered: true,
            error: None,
        })),
        Err(WebhookError::NotConfigured) => Err(StatusCode::CONFLICT),
        Err(e) => Ok(Json(WebhookTestResponse {
            delivered: false,
            error: Some(e.to_string()),
        })),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook/test", post(test_webhook))
}
