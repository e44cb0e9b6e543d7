//! Bulk-submission ingest and result export
//!
//! The bulk input is a tabular file with one required column of tracking
//! numbers; every other column is ignored and blank cells are dropped
//! before submission. The export is the flat normalized view as delimited
//! text.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::core::normalize::NormalizedRecord;
use crate::utils::error::{Result, TrackerError};

/// Required column name in bulk-submission files.
pub const TRACKING_NUMBER_COLUMN: &str = "TrackingNumber";

/// Column headers of the exported results table.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Tracking Number",
    "Status",
    "Estimated Delivery",
    "Proof of Delivery",
    "Latest Event",
    "Event Date",
    "Location",
];

/// Read tracking numbers from CSV input.
///
/// Requires a `TrackingNumber` column; blank cells are dropped; other
/// columns are ignored.
pub fn read_tracking_numbers<R: io::Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim() == TRACKING_NUMBER_COLUMN)
        .ok_or_else(|| {
            TrackerError::InvalidInput(format!(
                "input must have a column named '{}'",
                TRACKING_NUMBER_COLUMN
            ))
        })?;

    let mut numbers = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if let Some(cell) = record.get(column) {
            let trimmed = cell.trim();
            if !trimmed.is_empty() {
                numbers.push(trimmed.to_string());
            }
        }
    }
    Ok(numbers)
}

/// Read tracking numbers from a CSV file on disk.
pub fn read_tracking_numbers_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path)?;
    read_tracking_numbers(file)
}

/// Write the normalized results table as CSV.
pub fn write_results_csv<W: io::Write>(records: &[NormalizedRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        let estimated_delivery = record.estimated_delivery.to_string();
        let event_time = record.latest_event_time.to_string();
        csv_writer.write_record([
            record.tracking_number.as_str(),
            record.status.as_str(),
            estimated_delivery.as_str(),
            record.proof_of_delivery.as_str(),
            record.latest_event.as_str(),
            event_time.as_str(),
            record.latest_event_location.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the normalized results table to a CSV file on disk.
pub fn write_results_csv_to_path<P: AsRef<Path>>(
    records: &[NormalizedRecord],
    path: P,
) -> Result<()> {
    let file = File::create(path)?;
    write_results_csv(records, file)
}
