//! Batch store over SQLite
//!
//! Persists batches and per-item raw tracking responses. Writes are
//! transactional at single-record granularity: each save upserts the batch
//! row and inserts the referencing record inside one transaction, so a
//! concurrent reader never observes a record whose batch does not exist,
//! and a failed save neither rolls back earlier records nor blocks later
//! ones.

mod models;

pub use models::{Batch, TrackingRecord};

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::utils::error::{Result, TrackerError};

/// Batch store backed by a SQLite connection pool
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a connection pool and enforce foreign keys.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Creating database connection pool");
        debug!("Database URL: {}", config.url);

        // Ensure the data directory exists for file-backed databases
        if let Some(path) = config.url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TrackerError::Config(format!("Failed to create data directory: {}", e))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(TrackerError::Database)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the schema if it does not exist.
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS batches (
                reference_id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tracking_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reference_id TEXT NOT NULL,
                tracking_number TEXT NOT NULL,
                raw_response TEXT NOT NULL,
                saved_at TEXT NOT NULL,
                FOREIGN KEY (reference_id) REFERENCES batches (reference_id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_tracking_records_reference
             ON tracking_records (reference_id)",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Idempotent batch creation: a duplicate reference is a no-op, so a
    /// re-used reference appends to the existing batch instead of erroring.
    pub async fn create_or_get_batch(&self, reference_id: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO batches (reference_id, created_at) VALUES (?1, ?2)
             ON CONFLICT (reference_id) DO NOTHING",
        )
        .bind(reference_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persist one raw response under a batch reference.
    ///
    /// The batch upsert and the record insert share a transaction; the
    /// batch row is in place before the referencing record is visible.
    pub async fn save_record(
        &self,
        reference_id: &str,
        tracking_number: &str,
        raw_response: &Value,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO batches (reference_id, created_at) VALUES (?1, ?2)
             ON CONFLICT (reference_id) DO NOTHING",
        )
        .bind(reference_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO tracking_records (reference_id, tracking_number, raw_response, saved_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(reference_id)
        .bind(tracking_number)
        .bind(Json(raw_response))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Saved record for {} under {}", tracking_number, reference_id);
        Ok(())
    }

    /// All batches, newest first.
    pub async fn list_batches(&self) -> Result<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(
            "SELECT reference_id, created_at FROM batches ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(batches)
    }

    /// One batch by reference, if it exists.
    pub async fn get_batch(&self, reference_id: &str) -> Result<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>(
            "SELECT reference_id, created_at FROM batches WHERE reference_id = ?1",
        )
        .bind(reference_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(batch)
    }

    /// All records of one batch, newest first.
    pub async fn batch_records(&self, reference_id: &str) -> Result<Vec<TrackingRecord>> {
        let records = sqlx::query_as::<_, TrackingRecord>(
            "SELECT id, reference_id, tracking_number, raw_response, saved_at
             FROM tracking_records WHERE reference_id = ?1
             ORDER BY saved_at DESC, id DESC",
        )
        .bind(reference_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Every record across all batches, newest first.
    pub async fn all_records(&self) -> Result<Vec<TrackingRecord>> {
        let records = sqlx::query_as::<_, TrackingRecord>(
            "SELECT id, reference_id, tracking_number, raw_response, saved_at
             FROM tracking_records
             ORDER BY saved_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Delete a batch; its records go with it via the cascade.
    pub async fn delete_batch(&self, reference_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM batches WHERE reference_id = ?1")
            .bind(reference_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}
