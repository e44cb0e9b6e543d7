//! Typed accessors over raw tracking responses
//!
//! Each function encodes exactly one traversal-and-default rule for the
//! nested response shape, so the defaulting policy lives in one place and
//! is testable on its own. Accessors return `Option`; sentinel substitution
//! happens in the caller.

use serde_json::Value;

/// Descend to `output.completeTrackResults[0].trackResults[0]`, the
/// container every per-shipment field hangs off of.
pub(super) fn track_info(raw: &Value) -> Option<&Value> {
    raw.get("output")?
        .get("completeTrackResults")?
        .get(0)?
        .get("trackResults")?
        .get(0)
}

/// Tracking number echoed by the API at the complete-result level.
pub(super) fn tracking_number(raw: &Value) -> Option<&str> {
    raw.get("output")?
        .get("completeTrackResults")?
        .get(0)?
        .get("trackingNumber")?
        .as_str()
}

/// Latest status, localized.
pub(super) fn status(info: &Value) -> Option<&str> {
    info.get("latestStatusDetail")?
        .get("statusByLocale")?
        .as_str()
}

/// Estimated delivery: the first date/time entry tagged `ESTIMATED_DELIVERY`.
pub(super) fn estimated_delivery(info: &Value) -> Option<&str> {
    info.get("dateAndTimes")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("type").and_then(Value::as_str) == Some("ESTIMATED_DELIVERY"))?
        .get("dateTime")?
        .as_str()
}

/// Proof of delivery: the type of the first available image that has one.
pub(super) fn proof_of_delivery(info: &Value) -> Option<&str> {
    info.get("availableImages")?
        .as_array()?
        .iter()
        .find_map(|image| image.get("type").and_then(Value::as_str))
        .filter(|t| !t.is_empty())
}

/// Scan/event history; an absent or malformed list is just empty.
pub(super) fn scan_events(info: &Value) -> &[Value] {
    info.get("scanEvents")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub(super) fn event_description(event: &Value) -> Option<&str> {
    event.get("eventDescription")?.as_str()
}

pub(super) fn event_date(event: &Value) -> Option<&str> {
    event.get("date")?.as_str()
}

pub(super) fn event_exception(event: &Value) -> Option<&str> {
    event.get("exceptionDescription")?.as_str()
}

/// Scan location as comma-joined city/state/country/postal, omitting empty
/// parts. `None` when no part is present.
pub(super) fn scan_location(event: &Value) -> Option<String> {
    let location = event.get("scanLocation")?;
    let parts: Vec<&str> = ["city", "stateOrProvinceCode", "countryCode", "postalCode"]
        .iter()
        .filter_map(|key| location.get(*key).and_then(Value::as_str))
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

pub(super) fn shipper_city(info: &Value) -> Option<&str> {
    info.get("shipperInformation")?
        .get("address")?
        .get("city")?
        .as_str()
}

pub(super) fn recipient_city(info: &Value) -> Option<&str> {
    info.get("recipientInformation")?
        .get("address")?
        .get("city")?
        .as_str()
}

/// Package weight: the value of the first entry in the weight list.
/// The API emits this as either a string or a bare number.
pub(super) fn package_weight(info: &Value) -> Option<String> {
    let value = info
        .get("packageDetails")?
        .get("weightAndDimensions")?
        .get("weight")?
        .get(0)?
        .get("value")?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
