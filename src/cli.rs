//! Command-line argument parsing for capwatch.

use crate::config::{DashboardConfig, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;

/// Terminal monitoring dashboard for bottle-cap inspection logs.
#[derive(Parser, Debug)]
#[command(name = "capwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Query service endpoint URL (e.g., https://query.us-west-2.example.com)
    #[arg(short = 'e', long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Region identifier sent with every service request
    #[arg(short = 'r', long, value_name = "REGION")]
    pub region: Option<String>,

    /// Logical database the dashboard queries run against
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub database: Option<String>,

    /// Object-storage location for query results
    #[arg(short = 'o', long, value_name = "URI")]
    pub output_location: Option<String>,

    /// Logical table holding parsed inspection events
    #[arg(long, value_name = "TABLE")]
    pub table: Option<String>,

    /// Row limit for the table panels
    #[arg(long, value_name = "N")]
    pub row_limit: Option<u32>,

    /// Delay between status polls, in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Upper bound on one query's total wait, in seconds (0 = unbounded)
    #[arg(long, value_name = "SECS")]
    pub poll_timeout_secs: Option<u64>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Render the panels once as plain text and exit (no terminal UI)
    #[arg(long)]
    pub headless: bool,

    /// Use a mock query service preloaded with sample data
    #[arg(long)]
    pub mock_service: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path (CLI override or platform default).
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Converts CLI arguments to a service config for merging over the file
    /// config.
    pub fn to_service_config(&self) -> ServiceConfig {
        ServiceConfig {
            endpoint: self.endpoint.clone(),
            region: self
                .region
                .clone()
                .unwrap_or_else(|| ServiceConfig::default().region),
            database: self.database.clone(),
            output_location: self.output_location.clone(),
        }
    }

    /// Applies CLI dashboard overrides on top of the file config.
    pub fn apply_dashboard_overrides(&self, config: &mut DashboardConfig) {
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(limit) = self.row_limit {
            config.row_limit = limit;
        }
        if let Some(interval) = self.poll_interval_ms {
            config.poll_interval_ms = interval;
        }
        if let Some(timeout) = self.poll_timeout_secs {
            config.poll_timeout_secs = timeout;
        }
    }
}
