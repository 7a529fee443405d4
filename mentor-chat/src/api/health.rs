//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (e.g., "ok", "degraded")
    pub status: String,
    /// Module name ("mentor-chat")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Whether a generative provider is configured
    pub provider_configured: bool,
}

/// GET /health
///
/// Reports "degraded" when no generative provider is configured: the
/// service still answers, but every AI path runs its fallback.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let provider_configured = state.capabilities.tutor.is_some();

    Json(HealthResponse {
        status: if provider_configured { "ok" } else { "degraded" }.to_string(),
        module: "mentor-chat".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        provider_configured,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
