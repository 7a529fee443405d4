//! Message API handlers
//!
//! GET /conversations/{id}/messages, POST /conversations/{id}/messages

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use mentor_common::db::models::Message;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::services::{MessagePipeline, MessageRequest};
use crate::{db, AppState};

/// POST /conversations/{id}/messages request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub content: String,
    #[serde(default)]
    pub generate_image: bool,
    #[serde(default)]
    pub generate_mind_map: bool,
    #[serde(default)]
    pub add_emojis: bool,
}

/// POST /conversations/{id}/messages response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageResponse {
    pub user_message: Message,
    pub assistant_message: Message,
}

/// GET /conversations/{id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = db::messages::list_for_conversation(&state.db, id).await?;
    Ok(Json(messages))
}

/// POST /conversations/{id}/messages
///
/// Runs the full message pipeline and returns both persisted messages.
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PostMessageRequest>,
) -> ApiResult<Json<PostMessageResponse>> {
    let pipeline = MessagePipeline::new(state.db.clone(), state.capabilities.clone());

    let (user_message, assistant_message) = pipeline
        .handle_incoming_message(
            id,
            &MessageRequest {
                content: request.content,
                generate_image: request.generate_image,
                generate_mind_map: request.generate_mind_map,
                add_emojis: request.add_emojis,
            },
        )
        .await?;

    Ok(Json(PostMessageResponse {
        user_message,
        assistant_message,
    }))
}

/// Build message routes
pub fn message_routes() -> Router<AppState> {
    Router::new().route(
        "/conversations/:id/messages",
        get(list_messages).post(post_message),
    )
}
