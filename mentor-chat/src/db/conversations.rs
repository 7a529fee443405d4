//! Conversation database operations

use chrono::Utc;
use mentor_common::db::models::Conversation;
use mentor_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Conversation> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Conversation {
        id: parse_uuid("id", &id)?,
        user_id: row.get("user_id"),
        title: row.get("title"),
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}

/// Create a new conversation
pub async fn create(pool: &SqlitePool, user_id: &str, title: &str) -> Result<Conversation> {
    let conversation = Conversation {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO conversations (id, user_id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(conversation.id.to_string())
    .bind(&conversation.user_id)
    .bind(&conversation.title)
    .bind(conversation.created_at.to_rfc3339())
    .bind(conversation.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(conversation)
}

/// List a user's conversations, most recently active first
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Conversation>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, title, created_at, updated_at
        FROM conversations
        WHERE user_id = ?
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_row).collect()
}

/// Load a conversation by id
pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Option<Conversation>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, title, created_at, updated_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_row).transpose()
}

/// Update a conversation's title and bump updated_at
pub async fn update_title(pool: &SqlitePool, id: Uuid, title: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE conversations
        SET title = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(Utc::now().to_rfc3339())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Bump updated_at without changing anything else
pub async fn touch(pool: &SqlitePool, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete a conversation and all of its messages.
///
/// Messages go first so a failure can never leave orphaned rows behind a
/// missing conversation. Returns false when the conversation didn't exist.
pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    sqlx::query("DELETE FROM messages WHERE conversation_id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete all of a user's conversations and their messages
pub async fn clear_for_user(pool: &SqlitePool, user_id: &str) -> Result<usize> {
    sqlx::query(
        r#"
        DELETE FROM messages
        WHERE conversation_id IN (SELECT id FROM conversations WHERE user_id = ?)
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    let result = sqlx::query("DELETE FROM conversations WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() as usize)
}
