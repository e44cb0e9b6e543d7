//! Configuration models
//!
//! Serde-backed settings for the tracking API, the batch store, and the
//! pacing policy applied between outbound lookups.

use serde::{Deserialize, Serialize};

fn default_auth_url() -> String {
    "https://apis-sandbox.fedex.com/oauth/token".to_string()
}

fn default_track_url() -> String {
    "https://apis-sandbox.fedex.com/track/v1/trackingnumbers".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_database_url() -> String {
    "sqlite:data/shiptrack.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_pacing_interval_ms() -> u64 {
    100
}

/// Tracking API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OAuth2 token endpoint for the client-credentials grant
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Tracking-lookup endpoint
    #[serde(default = "default_track_url")]
    pub track_url: String,
    /// API key (client id)
    #[serde(default)]
    pub api_key: String,
    /// API secret (client secret)
    #[serde(default)]
    pub api_secret: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            track_url: default_track_url(),
            api_key: String::new(),
            api_secret: String::new(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

/// Pacing configuration for sequential batch lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause between consecutive lookups, in milliseconds
    #[serde(default = "default_pacing_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_pacing_interval_ms(),
        }
    }
}
