//! Repository layer for mentor-chat
//!
//! Free functions over the shared SQLite pool, one module per entity.
//! Timestamps are stored as RFC 3339 TEXT and UUIDs as TEXT.

pub mod conversations;
pub mod interests;
pub mod messages;
pub mod progress;

use chrono::{DateTime, Utc};
use mentor_common::{Error, Result};
use uuid::Uuid;

/// Parse a stored RFC 3339 timestamp
pub(crate) fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", field, e)))
}

/// Parse a stored UUID
pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Internal(format!("Failed to parse {}: {}", field, e)))
}
