//! Persistent data models
//!
//! Entities serialize with camelCase field names for API compatibility
//! with the web client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A titled thread of messages belonging to one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation UUID
    pub id: Uuid,
    /// Owning user id (free text; auth is out of scope)
    pub user_id: String,
    /// Display title; AI-renamed after the first message
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation touching the conversation
    pub updated_at: DateTime<Utc>,
}

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

/// One turn within a conversation, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message UUID
    pub id: Uuid,
    /// Parent conversation
    pub conversation_id: Uuid,
    pub role: MessageRole,
    /// Textual content
    pub content: String,
    /// Generated image URL, when visual generation succeeded
    pub image_url: Option<String>,
    /// Generated mind map, when visual generation succeeded
    pub mind_map: Option<MindMap>,
    pub created_at: DateTime<Utc>,
}

/// Structured mind map: central topic plus ordered branches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMap {
    pub central_topic: String,
    pub branches: Vec<MindMapBranch>,
}

/// One branch of a mind map: a label plus ordered child strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapBranch {
    pub label: String,
    pub children: Vec<String>,
}

/// A user-level subject tag with a coarse progress percentage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInterest {
    /// Interest UUID
    pub id: Uuid,
    pub user_id: String,
    /// Free-text interest label; unique-ish per user by convention only
    pub interest: String,
    /// Progress percentage (0-100); monotonic by convention, not enforced
    pub progress: i64,
    pub created_at: DateTime<Utc>,
}

/// Per-(user, topic) progress record backing the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    /// Record UUID
    pub id: Uuid,
    pub user_id: String,
    /// Topic key: the classified subject name or a raw content prefix,
    /// so a user's topics are not a clean taxonomy
    pub topic: String,
    /// Progress percentage (0-100)
    pub progress: i64,
    /// Cumulative count of visuals generated for this topic
    pub visuals_generated: i64,
    pub last_activity: DateTime<Utc>,
}

/// Derived dashboard statistics for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Arithmetic mean of progress across all rows (0 when none)
    pub overall_progress: i64,
    /// Distinct active days within the trailing 7-day window
    pub learning_streak: i64,
    /// Sum of visuals_generated across rows
    pub visuals_generated: i64,
    /// Number of learning_progress rows
    pub topics_explored: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(MessageRole::parse("user"), Some(MessageRole::User));
        assert_eq!(MessageRole::parse("assistant"), Some(MessageRole::Assistant));
        assert_eq!(MessageRole::parse("system"), None);
        assert_eq!(MessageRole::User.as_str(), "user");
    }

    #[test]
    fn test_mind_map_serialization() {
        let map = MindMap {
            central_topic: "Photosynthesis".to_string(),
            branches: vec![MindMapBranch {
                label: "Light reactions".to_string(),
                children: vec!["Chlorophyll".to_string(), "ATP".to_string()],
            }],
        };

        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("centralTopic"));

        let parsed: MindMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
    }
}
