//! HTTP request handlers

use super::types::{ErrorResponse, HealthResponse};
use super::AppState;
use crate::compose::OutboundPayload;
use crate::responder::respond;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Inbound chat events
        .route("/webhook", post(webhook))
        .route("/", post(webhook))
        // Liveness
        .route("/health", get(health))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Webhook
// ============================================================

/// Bodies that are not JSON are treated as an empty event
async fn webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<OutboundPayload>, AppError> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    // Store writes fsync under a mutex, so they run on the blocking pool
    let reply = tokio::task::spawn_blocking(move || respond(&state.rotation, &payload))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Webhook task did not complete");
            AppError::Internal
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to handle webhook event");
            AppError::Internal
        })?;

    Ok(Json(reply))
}

// ============================================================
// Health & Version
// ============================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_version() -> &'static str {
    concat!("daily-word ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
