//! Bulk ingest and export tests against real files

use std::io::Write;

use tempfile::NamedTempFile;

use shiptrack::utils::data;
use shiptrack::{normalize, TrackerError};

use crate::common::fixtures;

#[tokio::test]
async fn test_read_tracking_numbers_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"TrackingNumber,Note\n581190049992,first\n,skipped\n123456789012,second\n")
        .unwrap();

    let numbers = data::read_tracking_numbers_from_path(file.path()).unwrap();
    assert_eq!(numbers, vec!["581190049992", "123456789012"]);
}

#[tokio::test]
async fn test_read_tracking_numbers_missing_file() {
    let err = data::read_tracking_numbers_from_path("does/not/exist.csv").unwrap_err();
    assert!(matches!(err, TrackerError::Io(_)));
}

#[tokio::test]
async fn test_export_normalized_records_to_file() {
    let records = vec![
        normalize(&fixtures::delivered_response("A"), "A"),
        normalize(&fixtures::exception_response("C"), "C"),
    ];

    let file = NamedTempFile::new().unwrap();
    data::write_results_csv_to_path(&records, file.path()).unwrap();

    let written = std::fs::read_to_string(file.path()).unwrap();
    let mut lines = written.lines();
    assert!(lines.next().unwrap().starts_with("Tracking Number,Status"));
    assert!(written.contains("A,Delivered"));
    assert!(written.contains("C,Delivery exception"));
    // Header plus one row per record.
    assert_eq!(written.lines().count(), 3);
}
