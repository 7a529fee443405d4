//! Message-processing pipeline
//!
//! Coordinates one chat turn end to end: persist the user message, classify
//! the subject, title the conversation on its first message, book-keep
//! interests and progress, generate the tutor reply, conditionally generate
//! visuals, persist the assistant message.
//!
//! # Failure isolation
//! Only user-message persistence, conversation lookup, assistant-message
//! persistence, and the final conversation touch are fatal. Every
//! capability call and every bookkeeping write degrades to a fallback value
//! with a warn log, so the conversation never hard-fails once the user's
//! message is accepted. No call is retried.

use mentor_common::db::models::{Message, MessageRole, MindMap, UserInterest};
use mentor_common::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;
use crate::services::capability::{Capabilities, CapabilityError};

/// Subject used when classification fails or is not confident enough
pub const FALLBACK_SUBJECT: &str = "General Learning";
/// Icon paired with the fallback subject
pub const FALLBACK_ICON: &str = "📚";
/// Assistant text used when response generation fails
pub const FALLBACK_RESPONSE: &str =
    "I'm sorry, I'm having trouble generating a response right now. Please try again in a moment.";

/// Classifier results at or below this confidence fall back to the default subject
const CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Assistant replies longer than this many characters trigger visual generation
const VISUAL_TRIGGER_CHARS: usize = 50;
/// Progress assigned to a freshly created interest
const NEW_INTEREST_PROGRESS: i64 = 10;
/// Topic key length for the content-prefix progress record
const TOPIC_PREFIX_CHARS: usize = 100;

/// One incoming chat turn
#[derive(Debug, Clone)]
pub struct MessageRequest {
    pub content: String,
    pub generate_image: bool,
    pub generate_mind_map: bool,
    pub add_emojis: bool,
}

/// Pipeline orchestrator for incoming chat messages
pub struct MessagePipeline {
    db: SqlitePool,
    capabilities: Capabilities,
}

impl MessagePipeline {
    pub fn new(db: SqlitePool, capabilities: Capabilities) -> Self {
        Self { db, capabilities }
    }

    /// Process one incoming message and return (user message, assistant message)
    pub async fn handle_incoming_message(
        &self,
        conversation_id: Uuid,
        request: &MessageRequest,
    ) -> Result<(Message, Message)> {
        if request.content.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Message content must not be empty".to_string(),
            ));
        }
        let content = request.content.as_str();

        // Message count before this turn gates title generation and feeds
        // the subject-keyed progress value
        let prior_count = db::messages::count_for_conversation(&self.db, conversation_id).await?;

        // Persist the user message first; it is never rolled back
        let user_message = db::messages::insert(
            &self.db,
            conversation_id,
            MessageRole::User,
            content,
            None,
            None,
        )
        .await?;

        let conversation = db::conversations::get(&self.db, conversation_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Conversation not found: {}", conversation_id)))?;

        let interests = match db::interests::list_for_user(&self.db, &conversation.user_id).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "Failed to load interests; continuing without personalization"
                );
                Vec::new()
            }
        };

        let (subject, icon) = self.classify(content).await;

        if prior_count == 0 {
            self.apply_title(conversation_id, content, &subject, &icon).await;
        }

        self.record_interest(&conversation.user_id, &subject).await;

        let subject_progress = ((prior_count + 1) * 5).min(100);
        let flagged_visuals =
            i64::from(request.generate_image) + i64::from(request.generate_mind_map);
        if let Err(e) = db::progress::upsert(
            &self.db,
            &conversation.user_id,
            &subject,
            subject_progress,
            flagged_visuals,
        )
        .await
        {
            tracing::warn!(
                user_id = %conversation.user_id,
                subject = %subject,
                error = %e,
                "Failed to upsert subject progress"
            );
        }

        let system_prompt = build_system_prompt(&subject, request.add_emojis, &interests);
        let assistant_text = self.generate_response(&system_prompt, content).await;

        // Visuals trigger on reply length alone; the request flags feed only
        // the progress bookkeeping above
        let generate_visuals = assistant_text.chars().count() > VISUAL_TRIGGER_CHARS;
        let (image_url, mind_map) = if generate_visuals {
            self.generate_visuals(content).await
        } else {
            (None, None)
        };

        let assistant_message = db::messages::insert(
            &self.db,
            conversation_id,
            MessageRole::Assistant,
            &assistant_text,
            image_url,
            mind_map,
        )
        .await?;

        let topic_prefix: String = content.chars().take(TOPIC_PREFIX_CHARS).collect();
        let prefix_visuals = if generate_visuals { 2 } else { 0 };
        if let Err(e) = db::progress::upsert(
            &self.db,
            &conversation.user_id,
            &topic_prefix,
            NEW_INTEREST_PROGRESS,
            prefix_visuals,
        )
        .await
        {
            tracing::warn!(
                user_id = %conversation.user_id,
                error = %e,
                "Failed to upsert content-prefix progress"
            );
        }

        db::conversations::touch(&self.db, conversation_id).await?;

        tracing::info!(
            conversation_id = %conversation_id,
            subject = %subject,
            visuals = generate_visuals,
            "Message pipeline completed"
        );

        Ok((user_message, assistant_message))
    }

    /// Classify the message, falling back to the default subject on any
    /// failure or at confidence <= 0.7
    async fn classify(&self, content: &str) -> (String, String) {
        let result = match &self.capabilities.classifier {
            Some(classifier) => classifier.classify(content).await,
            None => Err(CapabilityError::NotConfigured),
        };

        match result {
            Ok(c) if c.confidence > CONFIDENCE_THRESHOLD => (c.subject, c.icon),
            Ok(c) => {
                tracing::debug!(
                    subject = %c.subject,
                    confidence = c.confidence,
                    "Classification below confidence threshold; using fallback subject"
                );
                (FALLBACK_SUBJECT.to_string(), FALLBACK_ICON.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Classification failed; using fallback subject");
                (FALLBACK_SUBJECT.to_string(), FALLBACK_ICON.to_string())
            }
        }
    }

    /// Best-effort conversation title update on the first message
    async fn apply_title(&self, conversation_id: Uuid, content: &str, subject: &str, icon: &str) {
        let generated = match &self.capabilities.title_generator {
            Some(title_generator) => title_generator.title_for(content).await,
            None => Err(CapabilityError::NotConfigured),
        };

        let title = match generated {
            Ok(title) => format!("{} {}", icon, title),
            Err(e) => {
                tracing::warn!(error = %e, "Title generation failed; using subject as title");
                format!("{} {}", icon, subject)
            }
        };

        if let Err(e) = db::conversations::update_title(&self.db, conversation_id, &title).await {
            tracing::warn!(
                conversation_id = %conversation_id,
                error = %e,
                "Failed to persist conversation title"
            );
        }
    }

    /// Create an interest for a newly detected subject; best-effort
    async fn record_interest(&self, user_id: &str, subject: &str) {
        if subject == FALLBACK_SUBJECT {
            return;
        }

        match db::interests::has_matching(&self.db, user_id, subject).await {
            Ok(true) => {}
            Ok(false) => {
                if let Err(e) =
                    db::interests::insert(&self.db, user_id, subject, NEW_INTEREST_PROGRESS).await
                {
                    tracing::warn!(
                        user_id = %user_id,
                        subject = %subject,
                        error = %e,
                        "Failed to create interest"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    subject = %subject,
                    error = %e,
                    "Interest lookup failed; skipping interest creation"
                );
            }
        }
    }

    /// Generate the tutor reply, substituting the apology on failure
    async fn generate_response(&self, system_prompt: &str, content: &str) -> String {
        let result = match &self.capabilities.tutor {
            Some(tutor) => tutor.respond(system_prompt, content).await,
            None => Err(CapabilityError::NotConfigured),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Response generation failed; using fallback response");
            FALLBACK_RESPONSE.to_string()
        })
    }

    /// Generate image and mind map concurrently; each failure leaves its
    /// field empty without affecting the other
    async fn generate_visuals(&self, content: &str) -> (Option<String>, Option<MindMap>) {
        let Some(visuals) = &self.capabilities.visuals else {
            return (None, None);
        };

        let image_prompt = format!("Educational diagram illustrating: {}", content);
        let (image, mind_map) = tokio::join!(visuals.image(&image_prompt), visuals.mind_map(content));

        let image_url = image
            .map_err(|e| tracing::warn!(error = %e, "Image generation failed"))
            .ok();
        let mind_map = mind_map
            .map_err(|e| tracing::warn!(error = %e, "Mind map generation failed"))
            .ok();

        (image_url, mind_map)
    }
}

/// Build the tutor persona prompt for the detected subject
fn build_system_prompt(subject: &str, add_emojis: bool, interests: &[UserInterest]) -> String {
    let mut prompt = format!(
        "You are an enthusiastic and patient tutor specializing in {}. \
         Explain concepts clearly and step by step, and end with a short \
         question that checks understanding.",
        subject
    );

    if add_emojis {
        prompt.push_str(" Use emojis to keep the explanation friendly and engaging.");
    }

    if !interests.is_empty() {
        let labels: Vec<&str> = interests.iter().map(|i| i.interest.as_str()).collect();
        prompt.push_str(&format!(
            " The student's interests include: {}. Relate examples to these interests when natural.",
            labels.join(", ")
        ));
    }

    prompt
}
