//! Aggregation over normalized records
//!
//! Builds the summary the dashboard-style consumers read: status counts,
//! per-city breakdowns, and a bucketed weight distribution. Classification
//! operates on the normalizer's output, so sentinel handling here matches
//! the tabular views exactly.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::normalize::{NormalizedRecord, UNAVAILABLE};

/// Default number of weight-histogram buckets
pub const DEFAULT_HISTOGRAM_BUCKETS: usize = 10;

/// One fixed-width weight bucket: `[lower, upper)`, the last bucket closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightBucket {
    /// Inclusive lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Records falling in this bucket
    pub count: usize,
}

/// Summary statistics over a set of normalized records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Total records summarized
    pub total: usize,
    /// Status is exactly `Delivered`
    pub delivered: usize,
    /// Neither delivered nor an exception
    pub in_transit: usize,
    /// Status contains `exception`, case-insensitively
    pub exceptions: usize,
    /// Count per shipper city, sentinel and empty cities excluded
    pub by_shipper_city: BTreeMap<String, usize>,
    /// Count per recipient city, sentinel and empty cities excluded
    pub by_recipient_city: BTreeMap<String, usize>,
    /// Bucketed weight counts; records without a parsed weight excluded
    pub weight_histogram: Vec<WeightBucket>,
}

fn is_delivered(status: &str) -> bool {
    status == "Delivered"
}

fn is_exception(status: &str) -> bool {
    status.to_lowercase().contains("exception")
}

fn groupable(city: &str) -> bool {
    !city.is_empty() && city != UNAVAILABLE
}

/// Summarize with the default histogram bucket count.
pub fn summarize(records: &[NormalizedRecord]) -> Summary {
    summarize_with_buckets(records, DEFAULT_HISTOGRAM_BUCKETS)
}

/// Summarize a record set.
///
/// The three status buckets are mutually exclusive and exhaustive: exact
/// `Delivered` wins, then the exception test, then everything else counts
/// as in transit. Never fails, whatever the record contents.
pub fn summarize_with_buckets(records: &[NormalizedRecord], bucket_count: usize) -> Summary {
    let mut summary = Summary {
        total: records.len(),
        ..Summary::default()
    };

    let mut weights = Vec::new();

    for record in records {
        if is_delivered(&record.status) {
            summary.delivered += 1;
        } else if is_exception(&record.status) {
            summary.exceptions += 1;
        } else {
            summary.in_transit += 1;
        }

        if groupable(&record.shipper_city) {
            *summary
                .by_shipper_city
                .entry(record.shipper_city.clone())
                .or_insert(0) += 1;
        }
        if groupable(&record.recipient_city) {
            *summary
                .by_recipient_city
                .entry(record.recipient_city.clone())
                .or_insert(0) += 1;
        }

        if let Some(weight) = record.weight {
            weights.push(weight);
        }
    }

    summary.weight_histogram = weight_histogram(&weights, bucket_count);
    summary
}

/// Fixed-width buckets over the observed range. Empty input yields an
/// empty histogram; a degenerate range (all weights equal) collapses to a
/// single bucket.
fn weight_histogram(weights: &[f64], bucket_count: usize) -> Vec<WeightBucket> {
    if weights.is_empty() || bucket_count == 0 {
        return Vec::new();
    }

    let min = weights.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = weights.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![WeightBucket {
            lower: min,
            upper: max,
            count: weights.len(),
        }];
    }

    let width = (max - min) / bucket_count as f64;
    let mut buckets: Vec<WeightBucket> = (0..bucket_count)
        .map(|i| WeightBucket {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &weight in weights {
        let index = (((weight - min) / width) as usize).min(bucket_count - 1);
        buckets[index].count += 1;
    }

    buckets
}
