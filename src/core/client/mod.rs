//! Tracking API client
//!
//! Wraps authentication and single-tracking-number lookup against the
//! carrier's tracking API. Authentication exchanges stored credentials for
//! a bearer token via the OAuth2 client-credentials grant; tokens are not
//! cached, callers re-authenticate per orchestration run.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::utils::error::{Result, TrackerError};

/// Bearer token returned by the auth endpoint.
#[derive(Debug, Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// The raw token value, for the Authorization header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Tracking API client
#[derive(Debug, Clone)]
pub struct TrackingClient {
    config: ApiConfig,
    http_client: Client,
}

impl TrackingClient {
    /// Create a client with the configured timeouts.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Any failure here (rejected credentials or an unreachable auth
    /// endpoint) is fatal to the whole run and is surfaced as
    /// [`TrackerError::Auth`].
    pub async fn authenticate(&self) -> Result<AccessToken> {
        debug!("Requesting access token from {}", self.config.auth_url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.api_key.as_str()),
            ("client_secret", self.config.api_secret.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.config.auth_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| TrackerError::Auth(format!("Auth endpoint unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Authentication rejected with status {}", status);
            return Err(TrackerError::Auth(format!(
                "Failed to authenticate: {} - {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::Auth(format!("Malformed token response: {}", e)))?;

        debug!("Access token obtained");
        Ok(AccessToken(token.access_token))
    }

    /// Look up one tracking number with detailed scans included.
    ///
    /// A non-success status becomes [`TrackerError::Fetch`] carrying the
    /// status code and body; the caller records it per item and continues.
    pub async fn track(&self, tracking_number: &str, token: &AccessToken) -> Result<Value> {
        debug!("Fetching tracking data for {}", tracking_number);

        let payload = json!({
            "trackingInfo": [
                {"trackingNumberInfo": {"trackingNumber": tracking_number}}
            ],
            "includeDetailedScans": true
        });

        let response = self
            .http_client
            .post(&self.config.track_url)
            .bearer_auth(token.as_str())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Tracking lookup for {} failed with status {}",
                tracking_number, status
            );
            return Err(TrackerError::Fetch {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
