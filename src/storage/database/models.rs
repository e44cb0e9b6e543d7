//! Rows stored by the batch store.
//!
//! Keep these structs focused on the data returned by queries; the
//! normalized view is derived elsewhere.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};

/// A bulk-upload batch: one row per submission, immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Batch {
    /// Unique batch reference
    pub reference_id: String,
    /// Creation time, set when the first record of the submission persists
    pub created_at: DateTime<Utc>,
}

/// One persisted tracking response. Never mutated; deleted only by the
/// cascade when its batch is deleted. Duplicate tracking numbers within and
/// across batches are allowed.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingRecord {
    /// Row id
    pub id: i64,
    /// Owning batch reference
    pub reference_id: String,
    /// Tracking number as submitted
    pub tracking_number: String,
    /// Raw response document, stored verbatim
    pub raw_response: Value,
    /// Persistence time
    pub saved_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for TrackingRecord {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let raw_response: Json<Value> = row.try_get("raw_response")?;
        Ok(Self {
            id: row.try_get("id")?,
            reference_id: row.try_get("reference_id")?,
            tracking_number: row.try_get("tracking_number")?,
            raw_response: raw_response.0,
            saved_at: row.try_get("saved_at")?,
        })
    }
}
