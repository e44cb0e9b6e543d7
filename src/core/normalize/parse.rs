//! Parse-or-sentinel helpers
//!
//! Field extraction from tracking responses must never raise: dates and
//! weights that fail to parse degrade to a defined fallback instead of an
//! error. These helpers are the only place that policy lives.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a timestamp from the formats the tracking API emits.
///
/// Accepts RFC 3339 with offset, a bare date-time without offset (assumed
/// UTC), and a bare date. Returns `None` for anything else; callers decide
/// whether that means a raw-string fallback or a sentinel.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// Parse a package weight value as a float.
///
/// Returns `None` on anything non-numeric so the record degrades to the
/// sentinel and is excluded from weight aggregation.
pub fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|w| w.is_finite())
}
