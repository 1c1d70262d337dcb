pub mod http;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::ClientError;
use crate::model::{
    CreatedTransaction, ExceptionRecord, Meta, Transaction, TransactionId, TransactionTag,
};

pub use http::LoggingServiceClient;

/// The logging service's transaction endpoints.
///
/// Implementations surface every failure to the caller and never retry.
pub trait TransactionApi {
    /// `POST /transaction`
    fn create_transaction(
        &self,
        tag: &TransactionTag,
        start_time: DateTime<Utc>,
        meta: Option<&Meta>,
    ) -> Result<CreatedTransaction, ClientError>;

    /// `PUT /transaction/{id}`, sending only the supplied fields.
    fn update_transaction(
        &self,
        id: &TransactionId,
        end_time: Option<DateTime<Utc>>,
        meta: Option<&Meta>,
        response_url: Option<&str>,
    ) -> Result<(), ClientError>;

    /// `GET /transaction/{id}`
    fn get_transaction(&self, id: &TransactionId) -> Result<Transaction, ClientError>;

    /// `POST /transaction/search`, distinct by tag.
    fn search_transactions(&self) -> Result<Vec<Transaction>, ClientError>;

    /// `POST /transaction/{id}/exception`
    fn create_transaction_exceptions(
        &self,
        id: &TransactionId,
        exceptions: &[ExceptionRecord],
    ) -> Result<(), ClientError>;
}

macro_rules! forward_transaction_api {
    ($($ptr:ty),*) => {$(
        impl<T: TransactionApi + ?Sized> TransactionApi for $ptr {
            fn create_transaction(
                &self,
                tag: &TransactionTag,
                start_time: DateTime<Utc>,
                meta: Option<&Meta>,
            ) -> Result<CreatedTransaction, ClientError> {
                (**self).create_transaction(tag, start_time, meta)
            }

            fn update_transaction(
                &self,
                id: &TransactionId,
                end_time: Option<DateTime<Utc>>,
                meta: Option<&Meta>,
                response_url: Option<&str>,
            ) -> Result<(), ClientError> {
                (**self).update_transaction(id, end_time, meta, response_url)
            }

            fn get_transaction(&self, id: &TransactionId) -> Result<Transaction, ClientError> {
                (**self).get_transaction(id)
            }

            fn search_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
                (**self).search_transactions()
            }

            fn create_transaction_exceptions(
                &self,
                id: &TransactionId,
                exceptions: &[ExceptionRecord],
            ) -> Result<(), ClientError> {
                (**self).create_transaction_exceptions(id, exceptions)
            }
        }
    )*};
}

forward_transaction_api!(&T, Box<T>, Arc<T>);
