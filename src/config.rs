//! Configuration management for capwatch.
//!
//! Handles loading configuration from a TOML file and environment variables.
//! All values are resolved once at startup and stay fixed for the process
//! lifetime.

use crate::error::{CapwatchError, Result};
use crate::query::PollOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main configuration structure for capwatch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query service connection values.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Dashboard behavior.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Query service connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the query service API.
    pub endpoint: Option<String>,

    /// Region identifier sent with every request.
    #[serde(default = "default_region")]
    pub region: String,

    /// Logical database the dashboard queries run against.
    pub database: Option<String>,

    /// Object-storage location where the service writes query results.
    pub output_location: Option<String>,
}

fn default_region() -> String {
    "us-west-2".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: default_region(),
            database: None,
            output_location: None,
        }
    }
}

impl ServiceConfig {
    /// Merges another config into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &ServiceConfig) {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint.clone();
        }
        if other.region != default_region() {
            self.region = other.region.clone();
        }
        if other.database.is_some() {
            self.database = other.database.clone();
        }
        if other.output_location.is_some() {
            self.output_location = other.output_location.clone();
        }
    }

    /// Applies environment variables as defaults for unset fields.
    pub fn apply_env_defaults(&mut self) {
        if self.endpoint.is_none() {
            self.endpoint = std::env::var("CAPWATCH_ENDPOINT").ok();
        }
        if self.region == default_region() {
            if let Ok(region) = std::env::var("CAPWATCH_REGION").or_else(|_| {
                std::env::var("AWS_REGION")
            }) {
                self.region = region;
            }
        }
        if self.database.is_none() {
            self.database = std::env::var("CAPWATCH_DATABASE").ok();
        }
        if self.output_location.is_none() {
            self.output_location = std::env::var("CAPWATCH_OUTPUT_LOCATION").ok();
        }
    }

    /// Validates the config into fully-resolved connection values.
    pub fn resolve(&self) -> Result<ServiceSettings> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| CapwatchError::config("Service endpoint is required"))?;

        let url = Url::parse(endpoint)
            .map_err(|e| CapwatchError::config(format!("Invalid endpoint URL: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CapwatchError::config(format!(
                "Invalid endpoint scheme '{}'. Expected 'http' or 'https'",
                url.scheme()
            )));
        }

        let database = self
            .database
            .as_deref()
            .ok_or_else(|| CapwatchError::config("Database name is required"))?;
        let output_location = self
            .output_location
            .as_deref()
            .ok_or_else(|| CapwatchError::config("Results output location is required"))?;

        Ok(ServiceSettings {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            region: self.region.clone(),
            database: database.to_string(),
            output_location: output_location.to_string(),
        })
    }

    /// Returns a display string for UI purposes.
    pub fn display_string(&self) -> String {
        let endpoint = self.endpoint.as_deref().unwrap_or("unset");
        let database = self.database.as_deref().unwrap_or("unset");
        format!("{database} @ {endpoint} ({})", self.region)
    }
}

/// Fully-resolved query service connection values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub endpoint: String,
    pub region: String,
    pub database: String,
    pub output_location: String,
}

/// Dashboard behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Logical table holding parsed inspection events.
    #[serde(default = "default_table")]
    pub table: String,

    /// Row limit applied to the table panels.
    #[serde(default = "default_row_limit")]
    pub row_limit: u32,

    /// Delay between consecutive status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound on one query's total wait, in seconds. 0 disables the
    /// bound.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

fn default_table() -> String {
    "parsed_logs".to_string()
}

fn default_row_limit() -> u32 {
    100
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_poll_timeout_secs() -> u64 {
    300
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            row_limit: default_row_limit(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl DashboardConfig {
    /// Returns the polling parameters for query lifecycles.
    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: match self.poll_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("capwatch")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CapwatchError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            CapwatchError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
