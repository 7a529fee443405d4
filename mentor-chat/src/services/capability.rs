//! Generative capability contracts
//!
//! The pipeline and the pass-through endpoints depend only on these trait
//! objects, never on a concrete provider. Each contract is independently
//! replaceable; tests substitute doubles.

use async_trait::async_trait;
use mentor_common::db::models::MindMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Capability call errors
///
/// Never surfaced from the message pipeline; converted to fallback values
/// at the call site. Pass-through endpoints map these to 502.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Network communication error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider API returned error response
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Provider response failed schema validation
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No provider configured (missing credential)
    #[error("Capability not configured")]
    NotConfigured,
}

/// Subject classification of free-text input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Detected subject (e.g., "Biology")
    pub subject: String,
    /// Coarse category (e.g., "Science")
    pub category: String,
    /// Display icon for the subject (single emoji)
    pub icon: String,
    /// Classifier confidence (0.0-1.0)
    pub confidence: f64,
}

/// Maps free-text input to a coarse educational subject
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify input text. Malformed provider output is total failure
    /// (ParseError), never a partial result.
    async fn classify(&self, text: &str) -> Result<Classification, CapabilityError>;
}

/// Produces a short human-readable label for a conversation
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    /// Generate a title of at most five words from the opening message
    async fn title_for(&self, text: &str) -> Result<String, CapabilityError>;
}

/// Produces the assistant's tutoring reply
#[async_trait]
pub trait TutorResponder: Send + Sync {
    async fn respond(&self, system_prompt: &str, user_text: &str)
        -> Result<String, CapabilityError>;
}

/// Image and mind-map synthesis; independent calls, independent failure
#[async_trait]
pub trait VisualGenerator: Send + Sync {
    /// Synthesize an image, returning its URL
    async fn image(&self, prompt: &str) -> Result<String, CapabilityError>;

    /// Synthesize a structured mind map
    async fn mind_map(&self, prompt: &str) -> Result<MindMap, CapabilityError>;
}

/// Text-to-speech synthesis
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech audio (MP3 bytes) from text
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, CapabilityError>;
}

/// Injected capability bundle.
///
/// Each slot is independently optional: a missing provider credential
/// leaves every slot None and all AI-dependent paths degrade to their
/// fallbacks instead of crashing.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub classifier: Option<Arc<dyn Classifier>>,
    pub title_generator: Option<Arc<dyn TitleGenerator>>,
    pub tutor: Option<Arc<dyn TutorResponder>>,
    pub visuals: Option<Arc<dyn VisualGenerator>>,
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
}

impl Capabilities {
    /// Fully disabled bundle (no provider configured)
    pub fn disabled() -> Self {
        Self::default()
    }
}
