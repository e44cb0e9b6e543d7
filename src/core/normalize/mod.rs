//! Result normalization
//!
//! Converts one raw tracking response into a flat [`NormalizedRecord`].
//! Normalization is total: missing containers, absent fields, and
//! unparsable dates or weights degrade to the [`UNAVAILABLE`] sentinel (or
//! a raw-string fallback for timestamps) and never produce an error. The
//! single-lookup view, the batch-results view, and the analytics view all
//! go through this one code path so their defaulting and tie-break policy
//! cannot drift apart.

mod accessors;
pub mod parse;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use parse::{parse_timestamp, parse_weight};

/// Placeholder for a field the response did not carry.
pub const UNAVAILABLE: &str = "N/A";

/// A timestamp as extracted from a response: parsed when possible, kept as
/// the raw string when not, absent when the field was missing entirely.
///
/// Ordering for latest-event selection goes through [`EventTime::sort_key`]:
/// unparsable and absent values sort as the minimum instant so they never
/// win over a real date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    /// Successfully parsed timestamp
    Parsed(DateTime<Utc>),
    /// Unparsable value, retained verbatim for display
    Raw(String),
    /// Field absent from the response
    Unavailable,
}

impl EventTime {
    /// Build from an optional raw field value.
    pub fn from_optional(raw: Option<&str>) -> Self {
        match raw {
            None => EventTime::Unavailable,
            Some(s) => match parse_timestamp(s) {
                Some(parsed) => EventTime::Parsed(parsed),
                None => EventTime::Raw(s.to_string()),
            },
        }
    }

    /// Comparison key for latest-event selection.
    pub fn sort_key(&self) -> DateTime<Utc> {
        match self {
            EventTime::Parsed(t) => *t,
            _ => DateTime::<Utc>::MIN_UTC,
        }
    }

    /// Whether any value (parsed or raw) was present.
    pub fn is_available(&self) -> bool {
        !matches!(self, EventTime::Unavailable)
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTime::Parsed(t) => write!(f, "{}", t.to_rfc3339()),
            EventTime::Raw(s) => write!(f, "{}", s),
            EventTime::Unavailable => write!(f, "{}", UNAVAILABLE),
        }
    }
}

impl Serialize for EventTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Flat view of one tracking response. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Tracking number from the response, or the caller's fallback id
    pub tracking_number: String,
    /// Latest localized status
    pub status: String,
    /// Estimated delivery time
    pub estimated_delivery: EventTime,
    /// Type of the first available proof-of-delivery image
    pub proof_of_delivery: String,
    /// Description of the most recent scan event
    pub latest_event: String,
    /// Time of the most recent scan event
    pub latest_event_time: EventTime,
    /// Location of the most recent scan event
    pub latest_event_location: String,
    /// Shipper city
    pub shipper_city: String,
    /// Recipient city
    pub recipient_city: String,
    /// First package weight, when it parsed as a number
    pub weight: Option<f64>,
}

impl NormalizedRecord {
    /// All-sentinel record keyed by the caller-supplied identifier.
    pub fn unavailable(fallback_id: &str) -> Self {
        Self {
            tracking_number: fallback_id.to_string(),
            status: UNAVAILABLE.to_string(),
            estimated_delivery: EventTime::Unavailable,
            proof_of_delivery: UNAVAILABLE.to_string(),
            latest_event: UNAVAILABLE.to_string(),
            latest_event_time: EventTime::Unavailable,
            latest_event_location: UNAVAILABLE.to_string(),
            shipper_city: UNAVAILABLE.to_string(),
            recipient_city: UNAVAILABLE.to_string(),
            weight: None,
        }
    }
}

/// One entry of a shipment's scan history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanEvent {
    /// Event description
    pub description: String,
    /// Event time
    pub time: EventTime,
    /// Exception description, when the event carried one
    pub exception: String,
    /// Comma-joined location parts
    pub location: String,
}

/// Normalize one raw tracking response.
///
/// Never fails: a response missing `output`, `completeTrackResults`, or
/// `trackResults` yields an all-sentinel record keyed by `fallback_id`.
pub fn normalize(raw: &Value, fallback_id: &str) -> NormalizedRecord {
    let Some(info) = accessors::track_info(raw) else {
        return NormalizedRecord::unavailable(fallback_id);
    };

    let (latest_event, latest_event_time, latest_event_location) =
        match latest_event(accessors::scan_events(info)) {
            Some(event) => (
                accessors::event_description(event)
                    .unwrap_or(UNAVAILABLE)
                    .to_string(),
                EventTime::from_optional(accessors::event_date(event)),
                accessors::scan_location(event).unwrap_or_else(|| UNAVAILABLE.to_string()),
            ),
            None => (
                UNAVAILABLE.to_string(),
                EventTime::Unavailable,
                UNAVAILABLE.to_string(),
            ),
        };

    NormalizedRecord {
        tracking_number: accessors::tracking_number(raw)
            .unwrap_or(fallback_id)
            .to_string(),
        status: accessors::status(info).unwrap_or(UNAVAILABLE).to_string(),
        estimated_delivery: EventTime::from_optional(accessors::estimated_delivery(info)),
        proof_of_delivery: accessors::proof_of_delivery(info)
            .unwrap_or(UNAVAILABLE)
            .to_string(),
        latest_event,
        latest_event_time,
        latest_event_location,
        shipper_city: accessors::shipper_city(info)
            .unwrap_or(UNAVAILABLE)
            .to_string(),
        recipient_city: accessors::recipient_city(info)
            .unwrap_or(UNAVAILABLE)
            .to_string(),
        weight: accessors::package_weight(info)
            .as_deref()
            .and_then(parse_weight),
    }
}

/// Full scan history of a response, newest first.
///
/// Uses the same date ordering as latest-event selection; events with
/// unparsable dates sink to the end, preserving their original relative
/// order.
pub fn scan_history(raw: &Value) -> Vec<ScanEvent> {
    let Some(info) = accessors::track_info(raw) else {
        return Vec::new();
    };

    let mut events: Vec<ScanEvent> = accessors::scan_events(info)
        .iter()
        .map(|event| ScanEvent {
            description: accessors::event_description(event)
                .unwrap_or(UNAVAILABLE)
                .to_string(),
            time: EventTime::from_optional(accessors::event_date(event)),
            exception: accessors::event_exception(event)
                .unwrap_or(UNAVAILABLE)
                .to_string(),
            location: accessors::scan_location(event).unwrap_or_else(|| UNAVAILABLE.to_string()),
        })
        .collect();

    // Stable sort: ties and unparsable dates keep their original order.
    events.sort_by(|a, b| b.time.sort_key().cmp(&a.time.sort_key()));
    events
}

/// The event whose parsed date is maximal; ties go to the earliest list
/// position. `None` only when the list is empty.
fn latest_event(events: &[Value]) -> Option<&Value> {
    let mut best: Option<(&Value, DateTime<Utc>)> = None;
    for event in events {
        let key = accessors::event_date(event)
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        match best {
            Some((_, best_key)) if key <= best_key => {}
            _ => best = Some((event, key)),
        }
    }
    best.map(|(event, _)| event)
}
