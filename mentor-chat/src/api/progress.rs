//! Learning progress API handlers
//!
//! GET /users/{userId}/progress

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use mentor_common::db::models::{LearningProgress, UserStats};
use serde::Serialize;

use crate::error::ApiResult;
use crate::{db, AppState};

/// GET /users/{userId}/progress response
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: Vec<LearningProgress>,
    pub stats: UserStats,
}

/// GET /users/{userId}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ProgressResponse>> {
    let progress = db::progress::list_for_user(&state.db, &user_id).await?;
    let stats = db::progress::user_stats(&state.db, &user_id).await?;

    Ok(Json(ProgressResponse { progress, stats }))
}

/// Build progress routes
pub fn progress_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/progress", get(get_progress))
}
