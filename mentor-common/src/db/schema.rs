//! Table schema for the Mentor database

use anyhow::Result;
use sqlx::SqlitePool;

/// Create Mentor tables if they don't exist
///
/// Messages reference their conversation but the foreign-key pragma stays
/// off (SQLite default): a user message persisted mid-pipeline survives a
/// concurrent conversation deletion, and cascade deletes are explicit
/// repository logic.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id TEXT PRIMARY KEY,
            conversation_id TEXT NOT NULL REFERENCES conversations(id),
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            image_url TEXT,
            mind_map TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_messages_conversation
        ON messages(conversation_id, created_at)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_interests (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            interest TEXT NOT NULL,
            progress INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS learning_progress (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            topic TEXT NOT NULL,
            progress INTEGER NOT NULL DEFAULT 0,
            visuals_generated INTEGER NOT NULL DEFAULT 0,
            last_activity TEXT NOT NULL,
            UNIQUE(user_id, topic)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!(
        "Database tables initialized (conversations, messages, user_interests, learning_progress)"
    );

    Ok(())
}
