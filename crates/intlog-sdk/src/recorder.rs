use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use intlog_core::model::{ExceptionRecord, Meta, TransactionId, TransactionTag, ERROR_COUNT_KEY};
use intlog_core::{ClientError, TransactionApi};

use crate::observer::FailureObserver;

/// Whether the service knows about this transaction yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RemoteStatus {
    /// No create call has been made.
    #[default]
    NotCreated,
    /// The service accepted the transaction under this id.
    Created(TransactionId),
    /// The create call failed. Terminal: creation is never retried.
    Failed,
}

/// Fields to change in [`TransactionRecorder::update`]. `None` leaves the
/// local value as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    pub end_time: Option<DateTime<Utc>>,
    pub meta: Option<Meta>,
    pub response_url: Option<String>,
}

impl TransactionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Mark the job finished now.
    pub fn finished(self) -> Self {
        self.end_time(Utc::now())
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Add one meta entry to this update.
    pub fn meta_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta
            .get_or_insert_with(Meta::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn response_url(mut self, url: impl Into<String>) -> Self {
        self.response_url = Some(url.into());
        self
    }

    /// True when nothing here is worth sending. An empty meta map or an
    /// empty response URL counts as not supplied.
    pub fn is_empty(&self) -> bool {
        self.end_time.is_none()
            && self.meta.as_ref().map_or(true, Meta::is_empty)
            && self.response_url.as_deref().map_or(true, str::is_empty)
    }
}

/// Tracks one integration sync job and mirrors it to the logging service.
///
/// The remote transaction is created lazily on the first write (`update` or
/// `flush_exceptions`), or explicitly via `create`. Remote failures never
/// reach the caller: they are passed to the registered [`FailureObserver`]
/// and otherwise only show up through [`is_error`](Self::is_error).
pub struct TransactionRecorder<A> {
    api: A,
    tag: TransactionTag,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    meta: Meta,
    response_url: Option<String>,
    status: RemoteStatus,
    exceptions: Vec<ExceptionRecord>,
    exception_count: u64,
    observer: Option<Box<dyn FailureObserver>>,
}

impl<A: TransactionApi> TransactionRecorder<A> {
    /// Start tracking a job. Makes no remote call.
    pub fn new(
        api: A,
        sync_type: &str,
        vendor: &str,
        credential_id: &str,
        meta: Option<Meta>,
    ) -> Self {
        let tag = TransactionTag::new(sync_type, vendor, credential_id);
        info!(%tag, "initialized integration transaction log");
        Self {
            api,
            tag,
            start_time: Utc::now(),
            end_time: None,
            meta: meta.unwrap_or_default(),
            response_url: None,
            status: RemoteStatus::NotCreated,
            exceptions: Vec::new(),
            exception_count: 0,
            observer: None,
        }
    }

    pub fn with_failure_observer(mut self, observer: impl FailureObserver + 'static) -> Self {
        self.set_http_error_handler(observer);
        self
    }

    /// Register the observer for absorbed remote failures, replacing any
    /// previous one.
    pub fn set_http_error_handler(
        &mut self,
        observer: impl FailureObserver + 'static,
    ) -> &mut Self {
        debug!(tag = %self.tag, "set failure observer");
        self.observer = Some(Box::new(observer));
        self
    }

    /// Set one meta key locally. Sent with the next create or update.
    pub fn set_meta_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        debug!(tag = %self.tag, %key, %value, "set meta field");
        self.meta.insert(key, value);
        self
    }

    /// Create the remote transaction unless it already exists or a previous
    /// attempt failed.
    pub fn create(&mut self) {
        if self.status != RemoteStatus::NotCreated {
            debug!(tag = %self.tag, status = ?self.status, "skipping create");
            return;
        }

        info!(tag = %self.tag, "creating transaction");
        match self
            .api
            .create_transaction(&self.tag, self.start_time, Some(&self.meta))
        {
            Ok(created) => {
                info!(tag = %self.tag, id = %created.integration_transaction_id, "created transaction");
                self.status = RemoteStatus::Created(created.integration_transaction_id);
            }
            Err(e) => {
                warn!(tag = %self.tag, error = %e, "failed to create transaction");
                self.status = RemoteStatus::Failed;
                self.notify(&e);
            }
        }
    }

    /// Merge `changes` into local state and push the result to the service.
    ///
    /// `meta.error_count` is refreshed from the exception count on every
    /// call. The remote update is sent only when `changes` supplies at least
    /// one field, and carries the full current end time, meta and response
    /// URL.
    pub fn update(&mut self, changes: TransactionUpdate) {
        debug!(tag = %self.tag, ?changes, "updating transaction");
        let supplied = !changes.is_empty();

        if let Some(end_time) = changes.end_time {
            self.end_time = Some(end_time);
        }
        if let Some(meta) = changes.meta {
            self.meta.extend(meta);
        }
        self.meta
            .insert(ERROR_COUNT_KEY.to_string(), Value::from(self.exception_count));
        if let Some(url) = changes.response_url {
            self.response_url = Some(url);
        }

        match self.status {
            RemoteStatus::NotCreated => self.create(),
            RemoteStatus::Failed => {
                debug!(tag = %self.tag, "transaction in error state, not creating");
            }
            RemoteStatus::Created(_) => {}
        }

        if !supplied {
            return;
        }
        let RemoteStatus::Created(id) = &self.status else {
            return;
        };

        if let Err(e) = self.api.update_transaction(
            id,
            self.end_time,
            Some(&self.meta),
            self.response_url.as_deref(),
        ) {
            warn!(tag = %self.tag, error = %e, "failed to update transaction");
            self.notify(&e);
        }
    }

    /// Record an error locally. Sent on the next `flush_exceptions`.
    pub fn add_exception<E: std::error::Error + ?Sized>(&mut self, error: &E) -> &mut Self {
        self.push_exception(ExceptionRecord::from_error(error))
    }

    /// Record a prepared exception locally.
    pub fn push_exception(&mut self, record: ExceptionRecord) -> &mut Self {
        debug!(tag = %self.tag, message = %record.message, "added exception");
        self.exceptions.push(record);
        self.exception_count += 1;
        self
    }

    /// Send all pending exceptions in one call. They are dropped locally
    /// only once the service accepted them.
    pub fn flush_exceptions(&mut self) {
        debug!(tag = %self.tag, pending = self.exceptions.len(), "flushing exceptions");

        if self.status == RemoteStatus::NotCreated {
            self.create();
        }

        if self.exceptions.is_empty() {
            return;
        }
        let RemoteStatus::Created(id) = &self.status else {
            return;
        };

        match self.api.create_transaction_exceptions(id, &self.exceptions) {
            Ok(()) => self.exceptions.clear(),
            Err(e) => {
                warn!(tag = %self.tag, error = %e, "failed to flush exceptions");
                self.notify(&e);
            }
        }
    }

    fn notify(&self, error: &ClientError) {
        if let Some(observer) = &self.observer {
            observer.on_failure(error);
        }
    }

    pub fn tag(&self) -> &TransactionTag {
        &self.tag
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn response_url(&self) -> Option<&str> {
        self.response_url.as_deref()
    }

    pub fn status(&self) -> &RemoteStatus {
        &self.status
    }

    pub fn remote_id(&self) -> Option<&TransactionId> {
        match &self.status {
            RemoteStatus::Created(id) => Some(id),
            _ => None,
        }
    }

    /// True once creation has failed.
    pub fn is_error(&self) -> bool {
        self.status == RemoteStatus::Failed
    }

    /// Exceptions not yet accepted by the service.
    pub fn pending_exceptions(&self) -> &[ExceptionRecord] {
        &self.exceptions
    }

    /// Exceptions recorded over the recorder's lifetime, flushed or not.
    pub fn exception_count(&self) -> u64 {
        self.exception_count
    }
}
