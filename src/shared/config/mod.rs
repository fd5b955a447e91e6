//! Application configuration module
//!
//! Provides the validated base configuration every client component reads:
//! server location, local data directory and network time bounds.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default server URL (REST root, including the `/api` prefix)
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000/api";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(10);

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// REST root, without trailing slash
    pub server_url: String,
    /// Directory holding the local database; platform data dir when `None`
    pub data_dir: Option<PathBuf>,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Upper bound for one sync attempt
    pub sync_timeout: Duration,
    /// Interval of the connectivity probe
    pub probe_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            data_dir: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
            probe_interval: DEFAULT_PROBE_INTERVAL,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue("request_timeout must be positive"));
        }
        if self.sync_timeout.is_zero() {
            return Err(ConfigError::InvalidValue("sync_timeout must be positive"));
        }
        if self.probe_interval.is_zero() {
            return Err(ConfigError::InvalidValue("probe_interval must be positive"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    data_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    sync_timeout_secs: Option<u64>,
    probe_interval_secs: Option<u64>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    pub fn sync_timeout_secs(mut self, secs: u64) -> Self {
        self.sync_timeout_secs = Some(secs);
        self
    }

    pub fn probe_interval_secs(mut self, secs: u64) -> Self {
        self.probe_interval_secs = Some(secs);
        self
    }

    /// Overlay every value set in `other` on top of this builder
    pub fn merge(mut self, other: AppConfigBuilder) -> Self {
        if other.server_url.is_some() {
            self.server_url = other.server_url;
        }
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.request_timeout_secs.is_some() {
            self.request_timeout_secs = other.request_timeout_secs;
        }
        if other.sync_timeout_secs.is_some() {
            self.sync_timeout_secs = other.sync_timeout_secs;
        }
        if other.probe_interval_secs.is_some() {
            self.probe_interval_secs = other.probe_interval_secs;
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            data_dir: self.data_dir,
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            sync_timeout: self
                .sync_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.sync_timeout),
            probe_interval: self
                .probe_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.probe_interval),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("invalid number in {key}: {value}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
