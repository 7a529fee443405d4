//! User interest database operations

use chrono::Utc;
use mentor_common::db::models::UserInterest;
use mentor_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserInterest> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");

    Ok(UserInterest {
        id: parse_uuid("id", &id)?,
        user_id: row.get("user_id"),
        interest: row.get("interest"),
        progress: row.get("progress"),
        created_at: parse_timestamp("created_at", &created_at)?,
    })
}

/// Insert a new interest
pub async fn insert(
    pool: &SqlitePool,
    user_id: &str,
    interest: &str,
    progress: i64,
) -> Result<UserInterest> {
    let record = UserInterest {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        interest: interest.to_string(),
        progress,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO user_interests (id, user_id, interest, progress, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.user_id)
    .bind(&record.interest)
    .bind(record.progress)
    .bind(record.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(record)
}

/// List a user's interests, oldest first
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<UserInterest>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, interest, progress, created_at
        FROM user_interests
        WHERE user_id = ?
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_row).collect()
}

/// Check whether any of the user's interest labels case-insensitively
/// contains the given subject.
///
/// Runs at the storage layer instead of scanning a loaded list, so the
/// probe stays correct under concurrent inserts.
pub async fn has_matching(pool: &SqlitePool, user_id: &str, subject: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM user_interests
        WHERE user_id = ? AND instr(lower(interest), lower(?)) > 0
        "#,
    )
    .bind(user_id)
    .bind(subject)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Delete an interest. Returns false when the id didn't exist.
pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM user_interests WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
