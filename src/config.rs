// Config module for catalog builder settings

use crate::constants;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest accepted `rpc_request_throttling` multiplier.
pub const MAX_THROTTLING: f64 = 3600.0;

pub fn config_dir() -> String {
    std::env::var("LABEXT_CATALOG_DIR").unwrap_or_else(|_| ".".to_string())
}

pub fn config_path() -> PathBuf {
    Path::new(&config_dir()).join(constants::CONFIG_FILE)
}

/// Settings for one catalog build.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the XML-RPC and JSON metadata APIs
    pub base_url: String,
    /// Seconds multiplied into the backoff delay after a rate-limit fault
    pub rpc_request_throttling: f64,
    /// Statistics endpoint template containing `{package}`
    pub stats_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            rpc_request_throttling: constants::DEFAULT_THROTTLING,
            stats_url: constants::DEFAULT_STATS_URL.to_string(),
            request_timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values given on the command line. `None` keeps the file/default value.
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub stats_url: Option<String>,
    pub throttle: Option<f64>,
    pub timeout: Option<u64>,
}

impl Config {
    /// Load the configuration file, falling back to defaults when the
    /// implicit file is absent. An explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (config_path(), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(stats_url) = overrides.stats_url {
            self.stats_url = stats_url;
        }
        if let Some(throttle) = overrides.throttle {
            self.rpc_request_throttling = throttle;
        }
        if let Some(timeout) = overrides.timeout {
            self.request_timeout_secs = timeout;
        }
        self
    }

    /// Check invariants and normalize the base URL.
    pub fn validate(mut self) -> anyhow::Result<Self> {
        let trimmed = self.base_url.trim_end_matches('/');
        if trimmed.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }
        self.base_url = trimmed.to_string();

        if !(0.0..=MAX_THROTTLING).contains(&self.rpc_request_throttling) {
            anyhow::bail!(
                "rpc_request_throttling must be between 0 and {}, got {}",
                MAX_THROTTLING,
                self.rpc_request_throttling
            );
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }

        if !self.stats_url.contains(constants::STATS_URL_PLACEHOLDER) {
            anyhow::bail!(
                "stats_url must contain the '{}' placeholder, got '{}'",
                constants::STATS_URL_PLACEHOLDER,
                self.stats_url
            );
        }

        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
