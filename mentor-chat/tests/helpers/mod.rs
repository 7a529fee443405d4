//! Shared test helpers: in-memory database and capability doubles
#![allow(dead_code)]

use async_trait::async_trait;
use mentor_chat::services::{
    Capabilities, CapabilityError, Classification, Classifier, SpeechSynthesizer, TitleGenerator,
    TutorResponder, VisualGenerator,
};
use mentor_chat::AppState;
use mentor_common::db::models::{MindMap, MindMapBranch};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Create an in-memory database with the full schema
pub async fn memory_pool() -> SqlitePool {
    mentor_common::db::init_memory_pool()
        .await
        .expect("Failed to create in-memory database")
}

/// Create test app state with the given capabilities
pub async fn test_app_state(capabilities: Capabilities) -> AppState {
    AppState::new(memory_pool().await, capabilities)
}

/// Classifier double
pub struct StubClassifier {
    pub subject: &'static str,
    pub icon: &'static str,
    pub confidence: f64,
    pub fail: bool,
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, CapabilityError> {
        if self.fail {
            return Err(CapabilityError::NetworkError("stub offline".to_string()));
        }
        Ok(Classification {
            subject: self.subject.to_string(),
            category: "Science".to_string(),
            icon: self.icon.to_string(),
            confidence: self.confidence,
        })
    }
}

/// Title generator double
pub struct StubTitleGenerator {
    pub title: &'static str,
    pub fail: bool,
}

#[async_trait]
impl TitleGenerator for StubTitleGenerator {
    async fn title_for(&self, _text: &str) -> Result<String, CapabilityError> {
        if self.fail {
            return Err(CapabilityError::NetworkError("stub offline".to_string()));
        }
        Ok(self.title.to_string())
    }
}

/// Tutor responder double
pub struct StubTutor {
    pub reply: String,
    pub fail: bool,
}

#[async_trait]
impl TutorResponder for StubTutor {
    async fn respond(
        &self,
        _system_prompt: &str,
        _user_text: &str,
    ) -> Result<String, CapabilityError> {
        if self.fail {
            return Err(CapabilityError::NetworkError("stub offline".to_string()));
        }
        Ok(self.reply.clone())
    }
}

/// Visual generator double with independently failing halves
pub struct StubVisuals {
    pub image_fail: bool,
    pub mind_map_fail: bool,
}

#[async_trait]
impl VisualGenerator for StubVisuals {
    async fn image(&self, _prompt: &str) -> Result<String, CapabilityError> {
        if self.image_fail {
            return Err(CapabilityError::ApiError(500, "stub image error".to_string()));
        }
        Ok("https://images.example/diagram.png".to_string())
    }

    async fn mind_map(&self, _prompt: &str) -> Result<MindMap, CapabilityError> {
        if self.mind_map_fail {
            return Err(CapabilityError::ParseError("stub map error".to_string()));
        }
        Ok(MindMap {
            central_topic: "Photosynthesis".to_string(),
            branches: vec![
                MindMapBranch {
                    label: "Light reactions".to_string(),
                    children: vec!["Chlorophyll".to_string(), "ATP".to_string()],
                },
                MindMapBranch {
                    label: "Calvin cycle".to_string(),
                    children: vec!["Carbon fixation".to_string()],
                },
            ],
        })
    }
}

/// Speech synthesizer double
pub struct StubSpeech {
    pub fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for StubSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, CapabilityError> {
        if self.fail {
            return Err(CapabilityError::NetworkError("stub offline".to_string()));
        }
        Ok(vec![0x49, 0x44, 0x33, 0x04, 0x00])
    }
}

/// A reply long enough to trip the visual-generation trigger
pub fn long_reply() -> String {
    "Photosynthesis converts light energy into chemical energy stored in glucose, \
     powering almost every food chain on Earth."
        .to_string()
}

/// Fully working capability bundle (confident Biology classification)
pub fn working_capabilities() -> Capabilities {
    Capabilities {
        classifier: Some(Arc::new(StubClassifier {
            subject: "Biology",
            icon: "🧬",
            confidence: 0.95,
            fail: false,
        })),
        title_generator: Some(Arc::new(StubTitleGenerator {
            title: "Photosynthesis Basics",
            fail: false,
        })),
        tutor: Some(Arc::new(StubTutor {
            reply: long_reply(),
            fail: false,
        })),
        visuals: Some(Arc::new(StubVisuals {
            image_fail: false,
            mind_map_fail: false,
        })),
        speech: Some(Arc::new(StubSpeech { fail: false })),
    }
}

/// Every capability call fails (provider unreachable)
pub fn failing_capabilities() -> Capabilities {
    Capabilities {
        classifier: Some(Arc::new(StubClassifier {
            subject: "",
            icon: "",
            confidence: 0.0,
            fail: true,
        })),
        title_generator: Some(Arc::new(StubTitleGenerator {
            title: "",
            fail: true,
        })),
        tutor: Some(Arc::new(StubTutor {
            reply: String::new(),
            fail: true,
        })),
        visuals: Some(Arc::new(StubVisuals {
            image_fail: true,
            mind_map_fail: true,
        })),
        speech: Some(Arc::new(StubSpeech { fail: true })),
    }
}
