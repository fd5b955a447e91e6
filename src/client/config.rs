use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_API_URL: &str = "CLIENT_API_URL";
const ENV_DATA_DIR: &str = "CLIENT_DATA_DIR";
const ENV_REQUEST_TIMEOUT: &str = "CLIENT_REQUEST_TIMEOUT_SECS";
const ENV_SYNC_TIMEOUT: &str = "CLIENT_SYNC_TIMEOUT_SECS";
const ENV_PROBE_INTERVAL: &str = "CLIENT_PROBE_INTERVAL_SECS";

/// Client configuration wrapper.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self { app: builder.build()? })
    }

    /// Defaults overridden by `CLIENT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_builder(env_overrides()?)
    }

    /// Values from a TOML document, then environment overrides
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: AppConfigBuilder = toml::from_str(contents)?;
        Self::with_builder(file.merge(env_overrides()?))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.server_url(), path.trim_start_matches('/'))
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.app.data_dir.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.app.request_timeout
    }

    pub fn sync_timeout(&self) -> Duration {
        self.app.sync_timeout
    }

    pub fn probe_interval(&self) -> Duration {
        self.app.probe_interval
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }
}

fn env_overrides() -> Result<AppConfigBuilder, ConfigError> {
    let mut builder = AppConfig::builder();
    if let Some(url) = env_value(ENV_API_URL) {
        builder = builder.server_url(url);
    }
    if let Some(dir) = env_value(ENV_DATA_DIR) {
        builder = builder.data_dir(PathBuf::from(dir));
    }
    if let Some(secs) = env_secs(ENV_REQUEST_TIMEOUT)? {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(secs) = env_secs(ENV_SYNC_TIMEOUT)? {
        builder = builder.sync_timeout_secs(secs);
    }
    if let Some(secs) = env_secs(ENV_PROBE_INTERVAL)? {
        builder = builder.probe_interval_secs(secs);
    }
    Ok(builder)
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_secs(key: &'static str) -> Result<Option<u64>, ConfigError> {
    match env_value(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(None),
    }
}
