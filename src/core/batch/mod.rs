//! Batch orchestration
//!
//! Drives a list of tracking identifiers through the tracking client
//! strictly one at a time, persisting each successful response under a
//! single generated batch reference and collecting per-item failures.
//! Only a total authentication failure aborts the run; everything else is
//! recorded and the batch continues.

pub mod pacing;

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::client::TrackingClient;
use crate::storage::Store;
use crate::utils::error::{Result, TrackerError};

use pacing::Pacer;

const REFERENCE_SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFERENCE_SUFFIX_LEN: usize = 4;

/// One identifier that could not be fetched or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// The identifier as submitted
    pub tracking_number: String,
    /// Why it failed
    pub reason: String,
}

/// Outcome of one batch submission. Partial failure is a normal outcome,
/// not an error.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSubmission {
    /// Reference the successful records were persisted under
    pub reference_id: String,
    /// Number of identifiers fetched and persisted
    pub success_count: usize,
    /// Identifiers that failed, with reasons, in input order
    pub failures: Vec<BatchFailure>,
}

impl BatchSubmission {
    /// Total identifiers attempted.
    pub fn attempted(&self) -> usize {
        self.success_count + self.failures.len()
    }
}

/// Generate a batch reference: timestamp plus a random suffix. Collisions
/// are vanishingly rare but not impossible; the store treats a re-used
/// reference as append-to-existing-batch.
pub fn generate_reference() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..REFERENCE_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..REFERENCE_SUFFIX_CHARSET.len());
            REFERENCE_SUFFIX_CHARSET[idx] as char
        })
        .collect();
    format!("BULK-{}-{}", Utc::now().format("%Y%m%d%H%M%S"), suffix)
}

/// Sequential batch driver: client for lookups, store for persistence,
/// pacer between consecutive calls.
pub struct BatchOrchestrator {
    client: TrackingClient,
    store: Store,
    pacer: Arc<dyn Pacer>,
}

impl BatchOrchestrator {
    /// Create an orchestrator with an injected pacing policy.
    pub fn new(client: TrackingClient, store: Store, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            client,
            store,
            pacer,
        }
    }

    /// Submit a batch of identifiers.
    ///
    /// Authenticates once, then processes identifiers in input order:
    /// fetch, persist, record failures, continue. Returns the aggregate
    /// outcome; errors only when the identifier list is empty or
    /// authentication fails before any work begins.
    pub async fn submit(&self, identifiers: &[String]) -> Result<BatchSubmission> {
        if identifiers.is_empty() {
            return Err(TrackerError::InvalidInput(
                "no tracking numbers to submit".into(),
            ));
        }

        let reference_id = generate_reference();
        info!(
            "Submitting batch {} with {} tracking numbers",
            reference_id,
            identifiers.len()
        );

        let token = self.client.authenticate().await?;

        let mut success_count = 0;
        let mut failures = Vec::new();

        for (index, tracking_number) in identifiers.iter().enumerate() {
            if index > 0 {
                self.pacer.pause().await;
            }

            if tracking_number.trim().is_empty() {
                failures.push(BatchFailure {
                    tracking_number: tracking_number.clone(),
                    reason: "empty tracking number".to_string(),
                });
                continue;
            }

            match self.client.track(tracking_number, &token).await {
                Ok(raw) => match self
                    .store
                    .save_record(&reference_id, tracking_number, &raw)
                    .await
                {
                    Ok(()) => success_count += 1,
                    Err(e) => {
                        warn!("Failed to persist record for {}: {}", tracking_number, e);
                        failures.push(BatchFailure {
                            tracking_number: tracking_number.clone(),
                            reason: e.to_string(),
                        });
                    }
                },
                Err(e) => {
                    warn!("Failed to fetch tracking info for {}: {}", tracking_number, e);
                    failures.push(BatchFailure {
                        tracking_number: tracking_number.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch {} complete: {} succeeded, {} failed",
            reference_id,
            success_count,
            failures.len()
        );

        Ok(BatchSubmission {
            reference_id,
            success_count,
            failures,
        })
    }
}
