//! Data model, configuration and blocking HTTP client for the integration
//! logging service.

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::{LoggingServiceClient, TransactionApi};
pub use config::ClientConfig;
pub use error::ClientError;
pub use reqwest::StatusCode;
