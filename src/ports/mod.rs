//! Ports: async interfaces the application layer depends on.
//!
//! Adapters (postgres, object storage, email) implement these traits; tests
//! substitute in-memory implementations.

mod audit_log;
mod invoice_repository;
mod mailer;
mod object_storage;
mod order_repository;
mod payment_ledger;

pub use audit_log::{record_or_log, AuditLog};
pub use invoice_repository::InvoiceRepository;
pub use mailer::{Attachment, MailError, Mailer, OutgoingEmail};
pub use object_storage::{ObjectStore, StorageError};
pub use order_repository::OrderRepository;
pub use payment_ledger::{CaptureOutcome, PaymentLedger};

use thiserror::Error;

/// Errors from the persistence ports.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced row does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The underlying database operation failed.
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn database(err: impl std::fmt::Display) -> Self {
        StoreError::Database(err.to_string())
    }
}
