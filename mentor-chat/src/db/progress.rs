//! Learning progress database operations and derived statistics

use chrono::{Duration, Utc};
use mentor_common::db::models::{LearningProgress, UserStats};
use mentor_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<LearningProgress> {
    let id: String = row.get("id");
    let last_activity: String = row.get("last_activity");

    Ok(LearningProgress {
        id: parse_uuid("id", &id)?,
        user_id: row.get("user_id"),
        topic: row.get("topic"),
        progress: row.get("progress"),
        visuals_generated: row.get("visuals_generated"),
        last_activity: parse_timestamp("last_activity", &last_activity)?,
    })
}

/// Upsert a progress record keyed by exact (user_id, topic).
///
/// Atomic at the database level via the UNIQUE index, so concurrent
/// pipelines cannot interleave a read-then-write on the same key.
pub async fn upsert(
    pool: &SqlitePool,
    user_id: &str,
    topic: &str,
    progress: i64,
    visuals_generated: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO learning_progress (id, user_id, topic, progress, visuals_generated, last_activity)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, topic) DO UPDATE SET
            progress = excluded.progress,
            visuals_generated = excluded.visuals_generated,
            last_activity = excluded.last_activity
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(topic)
    .bind(progress)
    .bind(visuals_generated)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// List a user's progress records, most recently active first
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<LearningProgress>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, topic, progress, visuals_generated, last_activity
        FROM learning_progress
        WHERE user_id = ?
        ORDER BY last_activity DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_row).collect()
}

/// Compute derived dashboard statistics for one user.
///
/// learning_streak counts distinct UTC calendar days with activity within
/// the trailing 7-day window.
pub async fn user_stats(pool: &SqlitePool, user_id: &str) -> Result<UserStats> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS topics,
            COALESCE(AVG(progress), 0.0) AS avg_progress,
            COALESCE(SUM(visuals_generated), 0) AS visuals
        FROM learning_progress
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let topics_explored: i64 = row.get("topics");
    let avg_progress: f64 = row.get("avg_progress");
    let visuals_generated: i64 = row.get("visuals");

    // RFC 3339 UTC strings compare lexicographically; substr(_, 1, 10) is
    // the calendar date.
    let cutoff = (Utc::now() - Duration::days(7)).to_rfc3339();
    let learning_streak: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(DISTINCT substr(last_activity, 1, 10))
        FROM learning_progress
        WHERE user_id = ? AND last_activity >= ?
        "#,
    )
    .bind(user_id)
    .bind(cutoff)
    .fetch_one(pool)
    .await?;

    Ok(UserStats {
        overall_progress: avg_progress.round() as i64,
        learning_streak,
        visuals_generated,
        topics_explored,
    })
}
