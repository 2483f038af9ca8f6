//! Typed configuration.
//!
//! Defaults, optionally overlaid by a TOML file, then by environment
//! variables. Loaded once at startup; bad values fail fast.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::storage::DEFAULT_KEY;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the file-backed key-value store.
    pub data_dir: PathBuf,
    /// Key the aggregate is stored under.
    pub store_key: String,
    /// Pause before an order is created, in milliseconds.
    pub order_delay_ms: u64,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            store_key: DEFAULT_KEY.to_string(),
            order_delay_ms: 600,
            otel_endpoint: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables over the defaults.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(env_var)
    }

    /// Load a TOML file, then apply environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse_toml(&text)?.with_overrides(env_var)
    }

    pub fn parse_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("invalid config file: {e}")))
    }

    /// Apply `ERP_*`, `OTEL_ENDPOINT` and `LOG_LEVEL` values from `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(dir) = lookup("ERP_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("ERP_STORE_KEY") {
            if key.trim().is_empty() {
                return Err(Error::Config("ERP_STORE_KEY must not be empty".to_string()));
            }
            self.store_key = key;
        }
        if let Some(ms) = lookup("ERP_ORDER_DELAY_MS") {
            self.order_delay_ms = ms.parse().map_err(|_| {
                Error::Config(format!("ERP_ORDER_DELAY_MS is not a number of milliseconds: {ms}"))
            })?;
        }
        if let Some(endpoint) = lookup("OTEL_ENDPOINT") {
            self.otel_endpoint = Some(endpoint);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(self)
    }

    pub fn order_delay(&self) -> Duration {
        Duration::from_millis(self.order_delay_ms)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
