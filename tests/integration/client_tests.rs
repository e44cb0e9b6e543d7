//! Tracking client tests against the simulated API

use serde_json::json;

use shiptrack::{TrackerError, TrackingClient};

use crate::common::fixtures;
use crate::common::tracking_api::MockTrackingApi;

#[tokio::test]
async fn test_authenticate_and_track() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup("581190049992", fixtures::delivered_response("581190049992"))
        .await;

    let client = TrackingClient::new(api.api_config()).unwrap();
    let token = client.authenticate().await.unwrap();
    let raw = client.track("581190049992", &token).await.unwrap();

    assert_eq!(
        raw["output"]["completeTrackResults"][0]["trackingNumber"],
        json!("581190049992")
    );
}

#[tokio::test]
async fn test_authenticate_rejected_is_auth_error() {
    let api = MockTrackingApi::start_with_rejected_auth().await;
    let client = TrackingClient::new(api.api_config()).unwrap();

    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, TrackerError::Auth(_)));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_auth_endpoint_unreachable_is_auth_error() {
    let mut config = MockTrackingApi::start().await.api_config();
    // Point at a closed port; the server itself is dropped with the value.
    config.auth_url = "http://127.0.0.1:9/oauth/token".to_string();
    config.connect_timeout = 1;
    config.request_timeout = 1;

    let client = TrackingClient::new(config).unwrap();
    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, TrackerError::Auth(_)));
}

#[tokio::test]
async fn test_lookup_failure_carries_status_and_body() {
    let api = MockTrackingApi::start().await;
    api.mock_lookup_failure(
        "000000000000",
        404,
        json!({"errors": [{"code": "TRACKING.TRACKINGNUMBER.NOTFOUND"}]}),
    )
    .await;

    let client = TrackingClient::new(api.api_config()).unwrap();
    let token = client.authenticate().await.unwrap();
    let err = client.track("000000000000", &token).await.unwrap_err();

    match err {
        TrackerError::Fetch { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("TRACKINGNUMBER.NOTFOUND"));
        }
        other => panic!("expected Fetch error, got {:?}", other),
    }
}
