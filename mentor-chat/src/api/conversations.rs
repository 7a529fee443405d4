//! Conversation API handlers
//!
//! GET /conversations/{userId}, POST /conversations,
//! PATCH /conversations/{id}/title, DELETE /conversations/{id},
//! DELETE /conversations/user/{userId}/clear

use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use mentor_common::db::models::Conversation;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::capability::CapabilityError;
use crate::{db, AppState};

/// Title used for conversations created without one
pub const DEFAULT_TITLE: &str = "New Learning Session";

/// Characters of content kept when title generation falls back
const FALLBACK_TITLE_CHARS: usize = 40;

/// POST /conversations request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub user_id: String,
    pub title: Option<String>,
}

/// PATCH /conversations/{id}/title request
#[derive(Debug, Deserialize)]
pub struct RenameConversationRequest {
    pub content: String,
}

/// GET /conversations/{userId}
pub async fn list_conversations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Conversation>>> {
    let conversations = db::conversations::list_for_user(&state.db, &user_id).await?;
    Ok(Json(conversations))
}

/// POST /conversations
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(request): Json<CreateConversationRequest>,
) -> ApiResult<Json<Conversation>> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("userId must not be empty".to_string()));
    }

    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let conversation = db::conversations::create(&state.db, &request.user_id, &title).await?;

    tracing::info!(
        conversation_id = %conversation.id,
        user_id = %conversation.user_id,
        "Conversation created"
    );

    Ok(Json(conversation))
}

/// PATCH /conversations/{id}/title
///
/// Renames a conversation with an AI-generated title for the given
/// content. Falls back to a content prefix when the capability is down.
pub async fn rename_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RenameConversationRequest>,
) -> ApiResult<Json<Conversation>> {
    if request.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content must not be empty".to_string()));
    }

    db::conversations::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Conversation not found: {}", id)))?;

    let generated = match &state.capabilities.title_generator {
        Some(title_generator) => title_generator.title_for(&request.content).await,
        None => Err(CapabilityError::NotConfigured),
    };

    let title = match generated {
        Ok(title) => title,
        Err(e) => {
            tracing::warn!(conversation_id = %id, error = %e, "Title generation failed; using content prefix");
            request.content.chars().take(FALLBACK_TITLE_CHARS).collect()
        }
    };

    db::conversations::update_title(&state.db, id, &title).await?;

    let conversation = db::conversations::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Conversation not found: {}", id)))?;

    Ok(Json(conversation))
}

/// DELETE /conversations/{id}
///
/// Cascade-deletes the conversation's messages before the conversation row.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let deleted = db::conversations::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Conversation not found: {}", id)));
    }

    tracing::info!(conversation_id = %id, "Conversation deleted");

    Ok(Json(json!({"success": true})))
}

/// DELETE /conversations/user/{userId}/clear
pub async fn clear_conversations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let removed = db::conversations::clear_for_user(&state.db, &user_id).await?;

    tracing::info!(user_id = %user_id, removed, "Cleared all conversations");

    Ok(Json(json!({"success": true, "removed": removed})))
}

/// Build conversation routes
pub fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", post(create_conversation))
        .route(
            "/conversations/:id",
            get(list_conversations).delete(delete_conversation),
        )
        .route("/conversations/:id/title", patch(rename_conversation))
        .route("/conversations/user/:id/clear", delete(clear_conversations))
}
