pub mod record;
pub mod search;
pub mod show;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use intlog_core::config::settings::{ENV_SERVICE_HOST, ENV_TIMEOUT_SECS};
use intlog_core::{ClientConfig, LoggingServiceClient};

#[derive(Subcommand)]
pub enum Commands {
    /// Show one transaction by id
    Show(show::ShowArgs),
    /// List transactions, one per tag
    Search(search::SearchArgs),
    /// Create a transaction for a sync job and report its state
    Record(record::RecordArgs),
}

/// Where the logging service lives.
#[derive(Args)]
pub struct ServiceArgs {
    /// Logging service base URL
    #[arg(long, global = true, env = ENV_SERVICE_HOST)]
    pub host: Option<String>,

    /// Request timeout in seconds (transport default when unset)
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS)]
    pub timeout_secs: Option<u64>,
}

impl ServiceArgs {
    pub fn client(&self) -> Result<LoggingServiceClient> {
        let mut config = match &self.host {
            Some(host) if !host.trim().is_empty() => ClientConfig::new(host),
            _ => ClientConfig::default(),
        };
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        LoggingServiceClient::new(config).context("Failed to build HTTP client")
    }
}
