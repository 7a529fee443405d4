//! mentor-chat library interface
//!
//! Exposes AppState and the router builder for the binary and for
//! integration tests.

pub mod api;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::services::Capabilities;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Injected generative capability bundle
    pub capabilities: Capabilities,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, capabilities: Capabilities) -> Self {
        Self {
            db,
            capabilities,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::conversation_routes())
        .merge(api::message_routes())
        .merge(api::interest_routes())
        .merge(api::progress_routes())
        .merge(api::generate_routes())
        .merge(api::health_routes())
        .with_state(state)
}
