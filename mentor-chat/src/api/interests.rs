//! User interest API handlers
//!
//! GET/POST /users/{userId}/interests, DELETE /users/{userId}/interests/{id}

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use mentor_common::db::models::UserInterest;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// POST /users/{userId}/interests request
#[derive(Debug, Deserialize)]
pub struct CreateInterestRequest {
    pub interest: String,
    #[serde(default)]
    pub progress: i64,
}

/// GET /users/{userId}/interests
pub async fn list_interests(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<UserInterest>>> {
    let interests = db::interests::list_for_user(&state.db, &user_id).await?;
    Ok(Json(interests))
}

/// POST /users/{userId}/interests
pub async fn create_interest(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateInterestRequest>,
) -> ApiResult<Json<UserInterest>> {
    if request.interest.trim().is_empty() {
        return Err(ApiError::BadRequest("interest must not be empty".to_string()));
    }
    if !(0..=100).contains(&request.progress) {
        return Err(ApiError::BadRequest(
            "progress must be between 0 and 100".to_string(),
        ));
    }

    let interest =
        db::interests::insert(&state.db, &user_id, &request.interest, request.progress).await?;

    Ok(Json(interest))
}

/// DELETE /users/{userId}/interests/{id}
pub async fn delete_interest(
    State(state): State<AppState>,
    Path((_user_id, id)): Path<(String, Uuid)>,
) -> ApiResult<Json<Value>> {
    let deleted = db::interests::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Interest not found: {}", id)));
    }

    Ok(Json(json!({"success": true})))
}

/// Build interest routes
pub fn interest_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:user_id/interests",
            get(list_interests).post(create_interest),
        )
        .route("/users/:user_id/interests/:id", delete(delete_interest))
}
