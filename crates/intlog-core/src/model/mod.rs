pub mod exception;
pub mod transaction;

pub use exception::{ExceptionBatch, ExceptionRecord};
pub use transaction::{
    CreateTransactionRequest, CreatedTransaction, Meta, SearchQuery, Transaction, TransactionId,
    TransactionTag, UpdateTransactionRequest, ERROR_COUNT_KEY,
};
