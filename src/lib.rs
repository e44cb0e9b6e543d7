//! # shiptrack
//!
//! Batch shipment-tracking pipeline: authenticates against a carrier
//! tracking API, fetches tracking data for one or many tracking numbers,
//! persists the raw responses keyed by an upload batch reference, and
//! rebuilds normalized tabular views and summary analytics from the
//! heterogeneous nested JSON.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use shiptrack::{Config, Tracker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/shiptrack.yaml").await?;
//!     let tracker = Tracker::new(config).await?;
//!
//!     let submission = tracker
//!         .submit_batch(&["581190049992".to_string(), "123456789012".to_string()])
//!         .await?;
//!     println!(
//!         "Batch {}: {} saved, {} failed",
//!         submission.reference_id,
//!         submission.success_count,
//!         submission.failures.len()
//!     );
//!
//!     let summary = tracker.summary(Some(&submission.reference_id)).await?;
//!     println!("{} delivered of {}", summary.delivered, summary.total);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::analytics::{summarize, summarize_with_buckets, Summary, WeightBucket};
pub use core::batch::pacing::{FixedInterval, NoPacing, Pacer};
pub use core::batch::{BatchFailure, BatchOrchestrator, BatchSubmission};
pub use core::client::{AccessToken, TrackingClient};
pub use core::normalize::{
    normalize, scan_history, EventTime, NormalizedRecord, ScanEvent, UNAVAILABLE,
};
pub use storage::{Batch, Store, TrackingRecord};
pub use utils::error::{Result, TrackerError};

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Result of a single-number lookup: the normalized record, the full scan
/// history (newest first), and the raw response for inspection.
#[derive(Debug, Clone)]
pub struct SingleLookup {
    /// Flat normalized view
    pub record: NormalizedRecord,
    /// Full scan history, newest first
    pub history: Vec<ScanEvent>,
    /// Raw response as returned by the API
    pub raw: Value,
}

/// Facade wiring the tracking client, the batch store, and the view
/// operations together. Each operation takes its inputs explicitly; there
/// is no ambient session state.
pub struct Tracker {
    client: TrackingClient,
    store: Store,
    pacing: config::PacingConfig,
}

impl Tracker {
    /// Create a tracker from configuration: build the HTTP client, connect
    /// the store, and run migrations.
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating tracker");
        config.validate()?;

        let client = TrackingClient::new(config.api.clone())?;
        let store = Store::connect(&config.storage.database).await?;
        store.migrate().await?;

        Ok(Self {
            client,
            store,
            pacing: config.pacing,
        })
    }

    /// The underlying store, for callers composing their own queries.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Look up one tracking number: authenticate, fetch, normalize.
    pub async fn track_single(&self, tracking_number: &str) -> Result<SingleLookup> {
        if tracking_number.trim().is_empty() {
            return Err(TrackerError::InvalidInput(
                "tracking number must not be empty".into(),
            ));
        }

        let token = self.client.authenticate().await?;
        let raw = self.client.track(tracking_number, &token).await?;

        Ok(SingleLookup {
            record: normalize(&raw, tracking_number),
            history: scan_history(&raw),
            raw,
        })
    }

    /// Submit a batch of tracking numbers with the configured pacing.
    pub async fn submit_batch(&self, identifiers: &[String]) -> Result<BatchSubmission> {
        let pacer = Arc::new(FixedInterval::from_millis(self.pacing.interval_ms));
        let orchestrator =
            BatchOrchestrator::new(self.client.clone(), self.store.clone(), pacer);
        orchestrator.submit(identifiers).await
    }

    /// All stored batches, newest first.
    pub async fn batches(&self) -> Result<Vec<Batch>> {
        self.store.list_batches().await
    }

    /// Normalized results for one batch, sorted by latest event time,
    /// newest first.
    pub async fn batch_results(&self, reference_id: &str) -> Result<Vec<NormalizedRecord>> {
        let batch = self
            .store
            .get_batch(reference_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("batch {}", reference_id)))?;

        let records = self.store.batch_records(&batch.reference_id).await?;
        let mut normalized: Vec<NormalizedRecord> = records
            .iter()
            .map(|r| normalize(&r.raw_response, &r.tracking_number))
            .collect();
        normalized.sort_by(|a, b| {
            b.latest_event_time
                .sort_key()
                .cmp(&a.latest_event_time.sort_key())
        });
        Ok(normalized)
    }

    /// Summary over one batch, or over every stored record when no
    /// reference is given.
    pub async fn summary(&self, reference_id: Option<&str>) -> Result<Summary> {
        let records = match reference_id {
            Some(id) => {
                self.store
                    .get_batch(id)
                    .await?
                    .ok_or_else(|| TrackerError::NotFound(format!("batch {}", id)))?;
                self.store.batch_records(id).await?
            }
            None => self.store.all_records().await?,
        };

        let normalized: Vec<NormalizedRecord> = records
            .iter()
            .map(|r| normalize(&r.raw_response, &r.tracking_number))
            .collect();
        Ok(summarize(&normalized))
    }

    /// Delete one batch and, via the cascade, its records. Returns whether
    /// the batch existed.
    pub async fn delete_batch(&self, reference_id: &str) -> Result<bool> {
        Ok(self.store.delete_batch(reference_id).await? > 0)
    }

    /// Close the store's connection pool.
    pub async fn close(&self) {
        self.store.close().await;
    }
}
