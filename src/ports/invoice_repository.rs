//! InvoiceRepository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::invoice::Invoice;

use super::StoreError;

/// Persistence interface for invoices.
///
/// At most one invoice exists per order. The lookup-before-insert pattern in
/// the application layer is backed here by `create_if_absent`, which must be
/// atomic with respect to concurrent issuance for the same order: under a
/// race, every caller receives the same winning row.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn find_by_order_id(&self, order_id: Uuid) -> Result<Option<Invoice>, StoreError>;

    /// Next value of the store-level invoice numbering sequence.
    async fn next_sequence_value(&self) -> Result<i64, StoreError>;

    /// Inserts the invoice unless one already exists for its order, and
    /// returns the row that ended up persisted.
    async fn create_if_absent(&self, invoice: Invoice) -> Result<Invoice, StoreError>;

    /// Replaces the stored document URLs without touching invoice identity.
    async fn update_document_urls(
        &self,
        invoice_id: Uuid,
        invoice_url: &str,
        contract_url: &str,
    ) -> Result<(), StoreError>;
}
