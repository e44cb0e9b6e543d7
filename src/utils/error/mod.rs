//! Error handling for the tracker
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for the tracker
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Main error type for the tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingest/export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Authentication failures against the tracking API.
    /// Fatal to a whole batch; surfaced before any lookup is attempted.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-success response for a single tracking lookup.
    /// Recorded per item; never aborts the batch.
    #[error("Tracking lookup failed with status {status}: {body}")]
    Fetch {
        /// HTTP status code returned by the tracking API
        status: u16,
        /// Response body as returned, for the per-item failure report
        body: String,
    },

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input (empty identifier list, missing CSV column)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TrackerError {
    /// Whether this error aborts a batch run or only the current item.
    ///
    /// Only authentication failures are batch-fatal; fetch and persistence
    /// failures are collected per item and the run continues.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, TrackerError::Auth(_))
    }
}
