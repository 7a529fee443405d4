//! Service modules for the tutoring chat workflow

pub mod capability;
pub mod knowledge_test;
pub mod openai_client;
pub mod pipeline;

pub use capability::{
    Capabilities, CapabilityError, Classification, Classifier, SpeechSynthesizer, TitleGenerator,
    TutorResponder, VisualGenerator,
};
pub use knowledge_test::{KnowledgeTest, KnowledgeTestBuilder, TestQuestion};
pub use openai_client::OpenAiClient;
pub use pipeline::{MessagePipeline, MessageRequest, FALLBACK_ICON, FALLBACK_RESPONSE, FALLBACK_SUBJECT};
