use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Not initialized: configure the logging service host before use")]
    NotInitialized,

    #[error("Logging service returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of the failed call, if the service answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
