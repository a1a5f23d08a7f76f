#![deny(missing_docs)]

//! # Settings
//!
//! Engine configuration, deserialized from YAML. Every field has a default so
//! an empty document is a valid configuration.

use crate::endpoints::{UrlBuilder, DEFAULT_HOST_TEMPLATE};
use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Resolve single entities from their list even when an id is given.
    pub request_by_id: bool,
    /// Allow at most one in-flight list fetch per fingerprint.
    pub single_flight: bool,
    /// Host URL with a `{platform}` placeholder.
    pub host_template: String,
    /// Options of the bundled HTTP transport.
    pub http: HttpSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_by_id: true,
            single_flight: true,
            host_template: DEFAULT_HOST_TEMPLATE.to_string(),
            http: HttpSettings::default(),
        }
    }
}

/// HTTP transport and rate limiting options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    /// Global per-request timeout.
    pub timeout_secs: u64,
    /// Sent as `X-Riot-Token` when set.
    pub api_key: Option<String>,
    /// Minimum spacing between requests of one bucket; 0 disables throttling.
    pub min_interval_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            api_key: None,
            min_interval_ms: 0,
        }
    }
}

impl HttpSettings {
    /// Timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Throttle interval as a `Duration`.
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Settings {
    /// Parses settings from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and parses a YAML settings file.
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let yaml = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> AppResult<()> {
        if self.http.timeout_secs == 0 {
            return Err(AppError::Config("http.timeout_secs must be positive".into()));
        }
        self.url_builder().map(|_| ())
    }

    /// URL builder for the configured host.
    pub fn url_builder(&self) -> AppResult<UrlBuilder> {
        UrlBuilder::new(&self.host_template)
    }
}
