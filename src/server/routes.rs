//! General HTTP route handlers.

use axum::{extract::State, Json};

use crate::types::HealthResponse;

use super::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check endpoint
///
/// GET /api/v1/health
///
/// The scored catalog is constructed before the listener binds, so a serving
/// process always reports healthy.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION.to_string(),
        tracks: state.catalog.len(),
        uptime_seconds: state.uptime_seconds(),
    })
}
