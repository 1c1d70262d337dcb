use std::backtrace::Backtrace;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An error observed during a sync job, as stored by the logging service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionRecord {
    pub message: String,
    pub stack_trace: String,
    pub created_time: DateTime<Utc>,
}

impl ExceptionRecord {
    pub fn new(message: impl Into<String>, stack_trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack_trace: stack_trace.into(),
            created_time: Utc::now(),
        }
    }

    /// Build a record from an error value.
    ///
    /// The stack trace lists the error's source chain followed by a
    /// backtrace captured here, at the reporting call site.
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        let mut trace = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            let _ = write!(trace, "\nCaused by: {cause}");
            source = cause.source();
        }
        let _ = write!(trace, "\n\n{}", Backtrace::force_capture());

        Self::new(error.to_string(), trace)
    }
}

/// Body of `POST /transaction/{id}/exception`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExceptionBatch<'a> {
    pub exceptions: &'a [ExceptionRecord],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Wrapped(std::io::Error);

    impl std::fmt::Display for Wrapped {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "vendor request failed")
        }
    }

    impl std::error::Error for Wrapped {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_from_error_captures_chain() {
        let err = Wrapped(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "read timed out",
        ));
        let record = ExceptionRecord::from_error(&err);

        assert_eq!(record.message, "vendor request failed");
        assert!(record.stack_trace.starts_with("vendor request failed\nCaused by: read timed out"));
        assert!(record.created_time <= Utc::now());
    }

    #[test]
    fn test_batch_shape() {
        let records = vec![ExceptionRecord::new("boom", "trace")];
        let body = serde_json::to_value(ExceptionBatch {
            exceptions: &records,
        })
        .unwrap();
        let first = &body["exceptions"][0];
        assert_eq!(first["message"], "boom");
        assert_eq!(first["stack_trace"], "trace");
        assert!(first["created_time"].is_string());
    }
}
