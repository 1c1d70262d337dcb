use std::time::Duration;

use crate::error::ClientError;

pub const ENV_SERVICE_HOST: &str = "INTLOG_SERVICE_HOST";
pub const ENV_TIMEOUT_SECS: &str = "INTLOG_TIMEOUT_SECS";

/// Connection settings for the logging service.
///
/// A config without a host is valid to construct; every client call made
/// with it fails with [`ClientError::NotInitialized`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    pub service_host: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(service_host: impl Into<String>) -> Self {
        Self {
            service_host: Some(normalize_host(service_host.into())),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read config from `INTLOG_SERVICE_HOST` and `INTLOG_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let service_host = lookup(ENV_SERVICE_HOST)
            .filter(|h| !h.trim().is_empty())
            .map(normalize_host);

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ClientError::Config(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got '{raw}'"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            service_host,
            timeout,
        })
    }

    /// The configured host, or `NotInitialized` when missing or blank.
    pub fn host(&self) -> Result<&str, ClientError> {
        match self.service_host.as_deref() {
            Some(host) if !host.is_empty() => Ok(host),
            _ => Err(ClientError::NotInitialized),
        }
    }
}

fn normalize_host(host: String) -> String {
    host.trim().trim_end_matches('/').to_string()
}
