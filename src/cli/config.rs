//! Service configuration
//!
//! Loaded from a JSON file; every field has a default, so a missing file or
//! an empty object yields a working in-memory service. `DATABASE_URI` in the
//! environment overrides the configured store location.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::observability::Severity;
use crate::store::StoreUri;

use super::errors::{CliError, CliResult};

/// Environment variable overriding `database_uri`
pub const DATABASE_URI_ENV: &str = "DATABASE_URI";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Store location: `memory://...` or `file://<dir>`
    #[serde(default = "default_database_uri")]
    pub database_uri: String,

    #[serde(default = "default_database_name")]
    pub database_name: String,

    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Startup connect bound (default: 10s)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Insert the starter catalog on boot
    #[serde(default = "default_seed_data")]
    pub seed_data: bool,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: HttpServerConfig,
}

fn default_database_uri() -> String {
    "memory://bookstore".to_string()
}
fn default_database_name() -> String {
    "exercise-2".to_string()
}
fn default_collection_name() -> String {
    "information".to_string()
}
fn default_connect_timeout_ms() -> u64 {
    10_000
}
fn default_seed_data() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_uri: default_database_uri(),
            database_name: default_database_name(),
            collection_name: default_collection_name(),
            connect_timeout_ms: default_connect_timeout_ms(),
            seed_data: default_seed_data(),
            log_level: default_log_level(),
            server: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Load from file if present, defaults otherwise; then apply the
    /// environment and validate
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
            serde_json::from_str(&content)
                .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?
        } else {
            Config::default()
        };

        let config = config.with_database_uri_override(std::env::var(DATABASE_URI_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate without touching the environment
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Replace `database_uri` when an override is set and non-empty
    pub fn with_database_uri_override(mut self, uri: Option<String>) -> Self {
        if let Some(uri) = uri.filter(|u| !u.trim().is_empty()) {
            self.database_uri = uri;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        self.database_uri
            .parse::<StoreUri>()
            .map_err(|e| CliError::config_error(format!("Invalid database_uri: {}", e)))?;

        if self.database_name.trim().is_empty() {
            return Err(CliError::config_error("database_name must not be empty"));
        }

        if self.collection_name.trim().is_empty() {
            return Err(CliError::config_error("collection_name must not be empty"));
        }

        if self.connect_timeout_ms == 0 {
            return Err(CliError::config_error("connect_timeout_ms must be > 0"));
        }

        self.severity()?;

        Ok(())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level.parse::<Severity>().map_err(|_| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error, or fatal.",
                self.log_level
            ))
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
