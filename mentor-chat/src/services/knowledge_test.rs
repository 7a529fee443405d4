//! Knowledge test builder
//!
//! Derives a short assessment from a user's conversation titles and
//! interests. Best-effort: when the generative capability is unavailable
//! or returns something unusable, a locally built self-assessment over the
//! user's interests is returned instead of an error.

use mentor_common::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db;
use crate::services::capability::{Capabilities, CapabilityError};
use crate::services::openai_client::extract_json_object;

const MAX_CONTEXT_TITLES: usize = 10;

/// Generated assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeTest {
    pub title: String,
    pub questions: Vec<TestQuestion>,
}

/// One multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestion {
    /// Topic the question probes
    pub topic: String,
    pub question: String,
    /// Answer options, at least two
    pub options: Vec<String>,
    /// Index into options of the correct answer
    pub correct_answer: usize,
}

/// Builds knowledge tests from a user's learning history
pub struct KnowledgeTestBuilder {
    db: SqlitePool,
    capabilities: Capabilities,
}

impl KnowledgeTestBuilder {
    pub fn new(db: SqlitePool, capabilities: Capabilities) -> Self {
        Self { db, capabilities }
    }

    /// Build an assessment for the user
    pub async fn build(&self, user_id: &str) -> Result<KnowledgeTest> {
        let conversations = db::conversations::list_for_user(&self.db, user_id).await?;
        let interests = db::interests::list_for_user(&self.db, user_id).await?;

        let titles: Vec<&str> = conversations
            .iter()
            .take(MAX_CONTEXT_TITLES)
            .map(|c| c.title.as_str())
            .collect();
        let interest_labels: Vec<String> =
            interests.iter().map(|i| i.interest.clone()).collect();

        match self.generate(&titles, &interest_labels).await {
            Ok(test) => Ok(test),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Knowledge test generation failed; using local fallback"
                );
                Ok(fallback_test(&interest_labels))
            }
        }
    }

    async fn generate(
        &self,
        titles: &[&str],
        interests: &[String],
    ) -> std::result::Result<KnowledgeTest, CapabilityError> {
        let tutor = self
            .capabilities
            .tutor
            .as_ref()
            .ok_or(CapabilityError::NotConfigured)?;

        let system = "You create a short knowledge test for a student. Respond with a JSON \
                      object: {\"title\": string, \"questions\": [{\"topic\": string, \
                      \"question\": string, \"options\": [string], \"correctAnswer\": number}]}. \
                      Write 3-5 multiple-choice questions with 4 options each; correctAnswer is \
                      the zero-based index of the right option.";

        let context = format!(
            "Recent study sessions: {}. Stated interests: {}.",
            if titles.is_empty() { "none".to_string() } else { titles.join("; ") },
            if interests.is_empty() { "none".to_string() } else { interests.join(", ") },
        );

        let raw = tutor.respond(system, &context).await?;
        let test: KnowledgeTest = serde_json::from_str(extract_json_object(&raw)?)
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        if test.questions.is_empty() {
            return Err(CapabilityError::ParseError("Test has no questions".to_string()));
        }
        for question in &test.questions {
            if question.options.len() < 2 || question.correct_answer >= question.options.len() {
                return Err(CapabilityError::ParseError(
                    "Question options/answer out of shape".to_string(),
                ));
            }
        }

        Ok(test)
    }
}

/// Self-assessment quiz built without the generative capability
fn fallback_test(interests: &[String]) -> KnowledgeTest {
    let topics: Vec<String> = if interests.is_empty() {
        vec!["General Learning".to_string()]
    } else {
        interests.to_vec()
    };

    let questions = topics
        .iter()
        .map(|topic| TestQuestion {
            topic: topic.clone(),
            question: format!("How confident do you feel about {}?", topic),
            options: vec![
                "Just starting".to_string(),
                "Getting comfortable".to_string(),
                "Confident".to_string(),
                "Could teach it".to_string(),
            ],
            correct_answer: 0,
        })
        .collect();

    KnowledgeTest {
        title: "Self-assessment".to_string(),
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_covers_interests() {
        let test = fallback_test(&["Biology".to_string(), "Algebra".to_string()]);
        assert_eq!(test.questions.len(), 2);
        assert_eq!(test.questions[0].topic, "Biology");
        assert!(test.questions.iter().all(|q| q.options.len() == 4));
    }

    #[test]
    fn test_fallback_without_interests() {
        let test = fallback_test(&[]);
        assert_eq!(test.questions.len(), 1);
        assert_eq!(test.questions[0].topic, "General Learning");
    }
}
