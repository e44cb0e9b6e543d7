//! End-to-end pipeline tests: submit → persist → normalize → summarize

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;

use shiptrack::config::Config;
use shiptrack::{
    BatchOrchestrator, NoPacing, Pacer, Tracker, TrackerError, TrackingClient,
};

use crate::common::database::{create_test_store, test_db_config};
use crate::common::fixtures;
use crate::common::tracking_api::MockTrackingApi;

/// Pacer that only counts how often it is asked to pause.
#[derive(Default)]
struct CountingPacer {
    pauses: AtomicUsize,
}

#[async_trait::async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_partial_failure_keeps_other_records() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup("A", fixtures::delivered_response("A")).await;
    api.mock_lookup_failure("B", 500, json!({"errors": [{"code": "SYSTEM.UNAVAILABLE"}]}))
        .await;
    api.mock_lookup("C", fixtures::in_transit_response("C")).await;

    let store = create_test_store().await;
    let client = TrackingClient::new(api.api_config()).unwrap();
    let orchestrator = BatchOrchestrator::new(client, store.clone(), Arc::new(NoPacing));

    let submission = orchestrator.submit(&ids(&["A", "B", "C"])).await.unwrap();

    assert_eq!(submission.success_count, 2);
    assert_eq!(submission.failures.len(), 1);
    assert_eq!(submission.failures[0].tracking_number, "B");
    assert!(submission.failures[0].reason.contains("500"));

    // Exactly A and C persisted, under the same reference.
    let records = store.batch_records(&submission.reference_id).await.unwrap();
    let mut numbers: Vec<&str> = records.iter().map(|r| r.tracking_number.as_str()).collect();
    numbers.sort();
    assert_eq!(numbers, vec!["A", "C"]);
}

#[tokio::test]
async fn test_pacer_runs_between_consecutive_items() {
    let api = MockTrackingApi::start().await;
    for number in ["A", "B", "C"] {
        api.mock_lookup(number, fixtures::in_transit_response(number)).await;
    }

    let store = create_test_store().await;
    let client = TrackingClient::new(api.api_config()).unwrap();
    let pacer = Arc::new(CountingPacer::default());
    let pacer_handle: Arc<dyn Pacer> = pacer.clone();
    let orchestrator = BatchOrchestrator::new(client, store, pacer_handle);

    let submission = orchestrator.submit(&ids(&["A", "B", "C"])).await.unwrap();

    assert_eq!(submission.success_count, 3);
    // One pause between each pair of consecutive items, none before the first.
    assert_eq!(pacer.pauses.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_auth_failure_aborts_before_any_work() {
    let api = MockTrackingApi::start_with_rejected_auth().await;

    let store = create_test_store().await;
    let client = TrackingClient::new(api.api_config()).unwrap();
    let orchestrator = BatchOrchestrator::new(client, store.clone(), Arc::new(NoPacing));

    let err = orchestrator.submit(&ids(&["A", "B"])).await.unwrap_err();
    assert!(matches!(err, TrackerError::Auth(_)));

    // Nothing was created.
    assert!(store.list_batches().await.unwrap().is_empty());
    assert!(store.all_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_submission_is_rejected() {
    let api = MockTrackingApi::start().await;
    let store = create_test_store().await;
    let client = TrackingClient::new(api.api_config()).unwrap();
    let orchestrator = BatchOrchestrator::new(client, store, Arc::new(NoPacing));

    let err = orchestrator.submit(&[]).await.unwrap_err();
    assert!(matches!(err, TrackerError::InvalidInput(_)));
}

#[tokio::test]
async fn test_blank_identifier_is_recorded_not_fetched() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup("A", fixtures::delivered_response("A")).await;

    let store = create_test_store().await;
    let client = TrackingClient::new(api.api_config()).unwrap();
    let orchestrator = BatchOrchestrator::new(client, store, Arc::new(NoPacing));

    let submission = orchestrator.submit(&ids(&["A", "  "])).await.unwrap();
    assert_eq!(submission.success_count, 1);
    assert_eq!(submission.failures.len(), 1);
    assert_eq!(submission.failures[0].reason, "empty tracking number");
}

async fn test_tracker(api: &MockTrackingApi) -> Tracker {
    let mut config = Config::default();
    config.api = api.api_config();
    config.storage.database = test_db_config();
    config.pacing.interval_ms = 0;
    Tracker::new(config).await.unwrap()
}

#[tokio::test]
async fn test_facade_submit_results_and_summary() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup("A", fixtures::delivered_response("A")).await;
    api.mock_lookup("B", fixtures::in_transit_response("B")).await;
    api.mock_lookup("C", fixtures::exception_response("C")).await;

    let tracker = test_tracker(&api).await;
    let submission = tracker.submit_batch(&ids(&["A", "B", "C"])).await.unwrap();
    assert_eq!(submission.success_count, 3);
    assert!(submission.failures.is_empty());

    let batches = tracker.batches().await.unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].reference_id, submission.reference_id);

    // Results sorted by latest event time, newest first:
    // C (Jan 6) > A (Jan 5) > B (Jan 4).
    let results = tracker.batch_results(&submission.reference_id).await.unwrap();
    let numbers: Vec<&str> = results.iter().map(|r| r.tracking_number.as_str()).collect();
    assert_eq!(numbers, vec!["C", "A", "B"]);
    assert_eq!(results[1].status, "Delivered");

    let summary = tracker.summary(Some(&submission.reference_id)).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.delivered, 1);
    assert_eq!(summary.in_transit, 1);
    assert_eq!(summary.exceptions, 1);

    // MEMPHIS ships A and B; CHICAGO ships C.
    assert_eq!(summary.by_shipper_city.get("MEMPHIS"), Some(&2));
    assert_eq!(summary.by_shipper_city.get("CHICAGO"), Some(&1));
    assert_eq!(summary.by_recipient_city.get("AUSTIN"), Some(&2));

    // C's weight is "N/A" and stays out of the histogram.
    let counted: usize = summary.weight_histogram.iter().map(|b| b.count).sum();
    assert_eq!(counted, 2);
}

#[tokio::test]
async fn test_facade_summary_over_all_batches() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup("A", fixtures::delivered_response("A")).await;
    api.mock_lookup("B", fixtures::delivered_response("B")).await;

    let tracker = test_tracker(&api).await;
    let first = tracker.submit_batch(&ids(&["A"])).await.unwrap();
    let second = tracker.submit_batch(&ids(&["B"])).await.unwrap();
    assert_eq!(first.success_count, 1);
    assert_eq!(second.success_count, 1);

    // Distinct submissions can collide on the same timestamp second; the
    // store would treat that as one batch, so the all-records summary is
    // what must count both.
    let summary = tracker.summary(None).await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.delivered, 2);
}

#[tokio::test]
async fn test_facade_unknown_batch_is_not_found() {
    let api = MockTrackingApi::start().await;
    let tracker = test_tracker(&api).await;

    let err = tracker.batch_results("BULK-MISSING").await.unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));

    let err = tracker.summary(Some("BULK-MISSING")).await.unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
}

#[tokio::test]
async fn test_facade_delete_batch() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup("A", fixtures::delivered_response("A")).await;

    let tracker = test_tracker(&api).await;
    let submission = tracker.submit_batch(&ids(&["A"])).await.unwrap();

    assert!(tracker.delete_batch(&submission.reference_id).await.unwrap());
    assert!(!tracker.delete_batch(&submission.reference_id).await.unwrap());

    let summary = tracker.summary(None).await.unwrap();
    assert_eq!(summary.total, 0);
}

#[tokio::test]
async fn test_facade_single_lookup() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup("581190049992", fixtures::delivered_response("581190049992"))
        .await;

    let tracker = test_tracker(&api).await;
    let lookup = tracker.track_single("581190049992").await.unwrap();

    assert_eq!(lookup.record.tracking_number, "581190049992");
    assert_eq!(lookup.record.status, "Delivered");
    assert_eq!(lookup.record.weight, Some(12.5));
    // History is newest first.
    assert_eq!(lookup.history.len(), 2);
    assert_eq!(lookup.history[0].description, "Delivered");

    let err = tracker.track_single("  ").await.unwrap_err();
    assert!(matches!(err, TrackerError::InvalidInput(_)));
}

#[tokio::test]
async fn test_stored_garbage_response_degrades_to_sentinels() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup("X", fixtures::empty_response()).await;

    let tracker = test_tracker(&api).await;
    let submission = tracker.submit_batch(&ids(&["X"])).await.unwrap();
    // The fetch succeeded, so the raw body persists even without track results.
    assert_eq!(submission.success_count, 1);

    let results = tracker.batch_results(&submission.reference_id).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].tracking_number, "X");
    assert_eq!(results[0].status, shiptrack::UNAVAILABLE);

    let summary = tracker.summary(None).await.unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.in_transit, 1);
    assert!(summary.by_shipper_city.is_empty());
}
