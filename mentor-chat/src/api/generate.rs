//! Direct generation API handlers
//!
//! POST /generate-image, POST /generate-mindmap,
//! POST /generate-knowledge-test, POST /text-to-speech
//!
//! Unlike the message pipeline these are pass-throughs with no fallback
//! value, so capability failure surfaces as 502.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use mentor_common::db::models::MindMap;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::capability::CapabilityError;
use crate::services::KnowledgeTestBuilder;
use crate::AppState;

/// POST /generate-image request
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

/// POST /generate-image response
#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    pub url: String,
}

/// POST /generate-mindmap request
#[derive(Debug, Deserialize)]
pub struct GenerateMindMapRequest {
    pub topic: String,
}

/// POST /generate-knowledge-test request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeTestRequest {
    pub user_id: String,
}

/// POST /text-to-speech request
#[derive(Debug, Deserialize)]
pub struct TextToSpeechRequest {
    pub text: String,
}

fn upstream(e: CapabilityError) -> ApiError {
    ApiError::Upstream(e.to_string())
}

/// POST /generate-image
pub async fn generate_image(
    State(state): State<AppState>,
    Json(request): Json<GenerateImageRequest>,
) -> ApiResult<Json<GenerateImageResponse>> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
    }

    let visuals = state
        .capabilities
        .visuals
        .as_ref()
        .ok_or_else(|| upstream(CapabilityError::NotConfigured))?;

    let url = visuals.image(&request.prompt).await.map_err(upstream)?;

    Ok(Json(GenerateImageResponse { url }))
}

/// POST /generate-mindmap
pub async fn generate_mindmap(
    State(state): State<AppState>,
    Json(request): Json<GenerateMindMapRequest>,
) -> ApiResult<Json<MindMap>> {
    if request.topic.trim().is_empty() {
        return Err(ApiError::BadRequest("topic must not be empty".to_string()));
    }

    let visuals = state
        .capabilities
        .visuals
        .as_ref()
        .ok_or_else(|| upstream(CapabilityError::NotConfigured))?;

    let mind_map = visuals.mind_map(&request.topic).await.map_err(upstream)?;

    Ok(Json(mind_map))
}

/// POST /generate-knowledge-test
pub async fn generate_knowledge_test(
    State(state): State<AppState>,
    Json(request): Json<KnowledgeTestRequest>,
) -> ApiResult<Json<crate::services::KnowledgeTest>> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("userId must not be empty".to_string()));
    }

    let builder = KnowledgeTestBuilder::new(state.db.clone(), state.capabilities.clone());
    let test = builder.build(&request.user_id).await?;

    Ok(Json(test))
}

/// POST /text-to-speech
///
/// Returns raw MP3 bytes.
pub async fn text_to_speech(
    State(state): State<AppState>,
    Json(request): Json<TextToSpeechRequest>,
) -> ApiResult<Response> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }

    let speech = state
        .capabilities
        .speech
        .as_ref()
        .ok_or_else(|| upstream(CapabilityError::NotConfigured))?;

    let audio = speech.synthesize(&request.text).await.map_err(upstream)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/mpeg")],
        audio,
    )
        .into_response())
}

/// Build generation routes
pub fn generate_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-image", post(generate_image))
        .route("/generate-mindmap", post(generate_mindmap))
        .route("/generate-knowledge-test", post(generate_knowledge_test))
        .route("/text-to-speech", post(text_to_speech))
}
