//! PostgreSQL implementations of the persistence ports (sqlx).

mod audit_log;
mod invoices;
mod orders;
mod payment_ledger;

pub use audit_log::PostgresAuditLog;
pub use invoices::PostgresInvoiceRepository;
pub use orders::PostgresOrderRepository;
pub use payment_ledger::PostgresPaymentLedger;
