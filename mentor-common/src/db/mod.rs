//! Database access for Mentor
//!
//! One shared SQLite database (mentor.db) in the data folder.

pub mod models;
pub mod schema;

use anyhow::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// Initialize database connection pool
///
/// Connects to mentor.db in the data folder, creating the file and the
/// schema on first run.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    // Keep the foreign-key pragma off to match the schema's documented intent
    // (sqlx enables it by default, unlike SQLite itself).
    let options = SqliteConnectOptions::from_str(&db_url)?.foreign_keys(false);
    let pool = SqlitePool::connect_with(options).await?;

    schema::init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize an in-memory database pool (tests)
///
/// Capped at one connection: every pooled connection would otherwise open
/// its own empty in-memory database.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(false);
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    schema::init_tables(&pool).await?;
    Ok(pool)
}
