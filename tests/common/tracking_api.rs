//! Simulated tracking API
//!
//! A wiremock server standing in for the carrier: an OAuth token endpoint
//! plus per-tracking-number lookup responses.

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shiptrack::config::ApiConfig;

pub const TEST_TOKEN: &str = "test-access-token";

/// Simulated tracking API backed by wiremock.
pub struct MockTrackingApi {
    pub server: MockServer,
}

impl MockTrackingApi {
    /// Start the server with a working token endpoint mounted.
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TEST_TOKEN,
                "token_type": "bearer",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        Self { server }
    }

    /// Start the server with an auth endpoint that rejects everything.
    pub async fn start_with_rejected_auth() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{"code": "NOT.AUTHORIZED.ERROR"}]
            })))
            .mount(&server)
            .await;

        Self { server }
    }

    /// Client configuration pointing at this server.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            auth_url: format!("{}/oauth/token", self.server.uri()),
            track_url: format!("{}/track/v1/trackingnumbers", self.server.uri()),
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            request_timeout: 5,
            connect_timeout: 5,
        }
    }

    /// Respond to lookups of one tracking number with this body.
    pub async fn mock_lookup(&self, tracking_number: &str, response: Value) {
        Mock::given(method("POST"))
            .and(path("/track/v1/trackingnumbers"))
            .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .and(body_partial_json(json!({
                "trackingInfo": [
                    {"trackingNumberInfo": {"trackingNumber": tracking_number}}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    /// Fail lookups of one tracking number with this status and body.
    pub async fn mock_lookup_failure(&self, tracking_number: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/track/v1/trackingnumbers"))
            .and(body_partial_json(json!({
                "trackingInfo": [
                    {"trackingNumberInfo": {"trackingNumber": tracking_number}}
                ]
            })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}
