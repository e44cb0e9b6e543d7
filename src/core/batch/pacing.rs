//! Pacing policies for sequential lookups
//!
//! The orchestrator paces outbound request rate through an injected policy
//! rather than inline sleeps, so call spacing can be asserted in tests
//! without real delays. Pacing is a policy knob, not a correctness
//! requirement.

use std::time::Duration;

use async_trait::async_trait;

/// A pause applied between consecutive outbound lookups.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait until the next call may be issued.
    async fn pause(&self);
}

/// Fixed interval between calls, the default policy.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    /// Create a pacer with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Convenience constructor from milliseconds.
    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }
}

#[async_trait]
impl Pacer for FixedInterval {
    async fn pause(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

/// No pacing at all, for tests and local backfills.
#[derive(Debug, Clone, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn pause(&self) {}
}
