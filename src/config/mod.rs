//! Configuration management for the tracker
//!
//! This module handles loading and validation of all tracker configuration.

pub mod models;

pub use models::{ApiConfig, DatabaseConfig, PacingConfig, StorageConfig};

use crate::utils::error::{Result, TrackerError};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the tracker
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Tracking API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Pacing configuration
    #[serde(default)]
    pub pacing: PacingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TrackerError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| TrackerError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Config::default();

        if let Ok(url) = std::env::var("TRACKING_AUTH_URL") {
            config.api.auth_url = url;
        }
        if let Ok(url) = std::env::var("TRACKING_API_URL") {
            config.api.track_url = url;
        }
        if let Ok(key) = std::env::var("TRACKING_API_KEY") {
            config.api.api_key = key;
        }
        if let Ok(secret) = std::env::var("TRACKING_API_SECRET") {
            config.api.api_secret = secret;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.storage.database.url = url;
        }
        if let Ok(interval) = std::env::var("PACING_INTERVAL_MS") {
            config.pacing.interval_ms = interval
                .parse()
                .map_err(|e| TrackerError::Config(format!("Invalid PACING_INTERVAL_MS: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if self.api.auth_url.is_empty() {
            return Err(TrackerError::Config("auth_url must not be empty".into()));
        }
        if self.api.track_url.is_empty() {
            return Err(TrackerError::Config("track_url must not be empty".into()));
        }
        if self.api.request_timeout == 0 {
            return Err(TrackerError::Config(
                "request_timeout must be greater than zero".into(),
            ));
        }
        if self.storage.database.url.is_empty() {
            return Err(TrackerError::Config(
                "database url must not be empty".into(),
            ));
        }
        if self.storage.database.max_connections == 0 {
            return Err(TrackerError::Config(
                "max_connections must be greater than zero".into(),
            ));
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Whether API credentials are present.
    ///
    /// Credentials are not required for read-only operations against the
    /// store (listing batches, rebuilding views), only for lookups.
    pub fn has_credentials(&self) -> bool {
        !self.api.api_key.is_empty() && !self.api.api_secret.is_empty()
    }
}
