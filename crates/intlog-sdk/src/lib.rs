//! Report integration sync jobs to the logging service.
//!
//! # Example
//! ```no_run
//! use intlog_sdk::{ClientConfig, LoggingServiceClient, TransactionRecorder, TransactionUpdate};
//!
//! let client = LoggingServiceClient::new(ClientConfig::new("http://logs.internal:8080")).unwrap();
//! let mut tx = TransactionRecorder::new(&client, "daily_sync", "acme", "cred-1", None)
//!     .with_failure_observer(|e: &intlog_sdk::ClientError| eprintln!("log service: {e}"));
//!
//! tx.update(TransactionUpdate::new().meta_field("status", "running"));
//! let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "vendor timed out");
//! tx.add_exception(&err);
//! tx.flush_exceptions();
//! tx.update(TransactionUpdate::new().meta_field("status", "done").finished());
//! ```

mod observer;
mod recorder;

pub use observer::FailureObserver;
pub use recorder::{RemoteStatus, TransactionRecorder, TransactionUpdate};

// Re-export core types that SDK users may need
pub use intlog_core::model::{ExceptionRecord, Meta, TransactionId, TransactionTag};
pub use intlog_core::{ClientConfig, ClientError, LoggingServiceClient, TransactionApi};
