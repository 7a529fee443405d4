//! Message database operations
//!
//! Messages are immutable once created; there is no update path.

use chrono::Utc;
use mentor_common::db::models::{Message, MessageRole, MindMap};
use mentor_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Message> {
    let id: String = row.get("id");
    let conversation_id: String = row.get("conversation_id");
    let role: String = row.get("role");
    let mind_map: Option<String> = row.get("mind_map");
    let created_at: String = row.get("created_at");

    let mind_map = mind_map
        .map(|json| {
            serde_json::from_str::<MindMap>(&json)
                .map_err(|e| Error::Internal(format!("Failed to parse mind_map: {}", e)))
        })
        .transpose()?;

    Ok(Message {
        id: parse_uuid("id", &id)?,
        conversation_id: parse_uuid("conversation_id", &conversation_id)?,
        role: MessageRole::parse(&role)
            .ok_or_else(|| Error::Internal(format!("Unknown message role: {}", role)))?,
        content: row.get("content"),
        image_url: row.get("image_url"),
        mind_map,
        created_at: parse_timestamp("created_at", &created_at)?,
    })
}

/// Insert a message and return it
pub async fn insert(
    pool: &SqlitePool,
    conversation_id: Uuid,
    role: MessageRole,
    content: &str,
    image_url: Option<String>,
    mind_map: Option<MindMap>,
) -> Result<Message> {
    let message = Message {
        id: Uuid::new_v4(),
        conversation_id,
        role,
        content: content.to_string(),
        image_url,
        mind_map,
        created_at: Utc::now(),
    };

    let mind_map_json = message
        .mind_map
        .as_ref()
        .map(|m| {
            serde_json::to_string(m)
                .map_err(|e| Error::Internal(format!("Failed to serialize mind_map: {}", e)))
        })
        .transpose()?;

    sqlx::query(
        r#"
        INSERT INTO messages (id, conversation_id, role, content, image_url, mind_map, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(message.id.to_string())
    .bind(message.conversation_id.to_string())
    .bind(message.role.as_str())
    .bind(&message.content)
    .bind(&message.image_url)
    .bind(&mind_map_json)
    .bind(message.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(message)
}

/// List a conversation's messages in creation order
pub async fn list_for_conversation(
    pool: &SqlitePool,
    conversation_id: Uuid,
) -> Result<Vec<Message>> {
    let rows = sqlx::query(
        r#"
        SELECT id, conversation_id, role, content, image_url, mind_map, created_at
        FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(conversation_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_row).collect()
}

/// Count a conversation's messages
pub async fn count_for_conversation(pool: &SqlitePool, conversation_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE conversation_id = ?")
        .bind(conversation_id.to_string())
        .fetch_one(pool)
        .await?;

    Ok(count)
}
