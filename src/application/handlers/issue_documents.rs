//! IssueDocumentsHandler - generates, publishes, and emails order documents.
//!
//! Entered from two places: synchronously from the webhook pipeline after a
//! capture, and independently from the manual regeneration endpoint. Both
//! paths are safe to run concurrently against the same order: an existing
//! invoice number is always reused, and publishing overwrites the stored
//! objects rather than duplicating them.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::audit::{Actor, AuditAction, AuditEntry};
use crate::domain::company::CompanyProfile;
use crate::domain::documents::{render_contract, render_invoice};
use crate::domain::invoice::{Invoice, InvoiceNumber};
use crate::domain::money::format_paise;
use crate::domain::order::{Order, ValidityWindow};
use crate::ports::{
    record_or_log, Attachment, AuditLog, InvoiceRepository, Mailer, ObjectStore, OrderRepository,
    OutgoingEmail, StorageError, StoreError,
};

/// Lifetime of the signed retrieval URLs (approximately one year).
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Errors from document issuance.
///
/// Document and storage failures abort the attempt and surface to the caller,
/// since the documents are the deliverable. Email failures never do.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("order {0} not found")]
    OrderNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What issuance produced.
#[derive(Debug, Clone)]
pub struct IssuedDocuments {
    pub invoice_number: String,
    pub invoice_url: String,
    pub contract_url: String,
    pub email_sent: bool,
}

/// Handler for generating and distributing invoice/contract documents.
pub struct IssueDocumentsHandler {
    orders: Arc<dyn OrderRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    store: Arc<dyn ObjectStore>,
    mailer: Option<Arc<dyn Mailer>>,
    audit: Arc<dyn AuditLog>,
    company: CompanyProfile,
}

impl IssueDocumentsHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        store: Arc<dyn ObjectStore>,
        mailer: Option<Arc<dyn Mailer>>,
        audit: Arc<dyn AuditLog>,
        company: CompanyProfile,
    ) -> Self {
        Self {
            orders,
            invoices,
            store,
            mailer,
            audit,
            company,
        }
    }

    /// Generates both documents for the order, publishes them, records the
    /// URLs on the invoice, and emails the customer.
    ///
    /// Assumes the order is already paid. Reuses the existing invoice number
    /// if one was assigned; regeneration only replaces bytes and URLs.
    pub async fn issue_for_order(
        &self,
        order_id: Uuid,
        actor: Actor,
    ) -> Result<IssuedDocuments, IssueError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(IssueError::OrderNotFound(order_id))?;

        let invoice = self.find_or_create_invoice(&order).await?;

        let invoice_bytes = render_invoice(&order, &invoice, &self.company);
        let contract_bytes = render_contract(&order, &invoice, &self.company);

        let invoice_key = format!("orders/{}/invoice.txt", order.id);
        let contract_key = format!("orders/{}/contract.txt", order.id);
        self.store.put(&invoice_key, &invoice_bytes).await?;
        self.store.put(&contract_key, &contract_bytes).await?;

        let invoice_url = self.store.signed_url(&invoice_key, SIGNED_URL_TTL).await?;
        let contract_url = self.store.signed_url(&contract_key, SIGNED_URL_TTL).await?;

        self.invoices
            .update_document_urls(invoice.id, &invoice_url, &contract_url)
            .await?;

        record_or_log(
            self.audit.as_ref(),
            AuditEntry::new(order.id, AuditAction::DocumentsGenerated, actor.clone())
                .with_amount(invoice.amount)
                .with_gateway_ids(
                    order.gateway_order_id.as_deref(),
                    order.gateway_payment_id.as_deref(),
                )
                .with_detail(serde_json::json!({
                    "invoice_number": invoice.number.as_str(),
                    "invoice_key": invoice_key,
                    "contract_key": contract_key,
                })),
        )
        .await;

        let email_sent = self
            .notify_customer(&order, &invoice, invoice_bytes, contract_bytes, &actor)
            .await;

        Ok(IssuedDocuments {
            invoice_number: invoice.number.to_string(),
            invoice_url,
            contract_url,
            email_sent,
        })
    }

    /// Looks up the order's invoice, minting one if this is the first
    /// issuance. The number, once assigned, is never regenerated.
    async fn find_or_create_invoice(&self, order: &Order) -> Result<Invoice, StoreError> {
        if let Some(existing) = self.invoices.find_by_order_id(order.id).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let (valid_from, valid_until) = match (order.valid_from, order.valid_until) {
            (Some(from), Some(until)) => (from, until),
            // Fallback path: issuance requested before activation stamped a window
            _ => {
                let window = ValidityWindow::annual_from(now);
                (window.starts_at, window.ends_at)
            }
        };

        let sequence = self.invoices.next_sequence_value().await?;
        let number = InvoiceNumber::mint(now.date_naive(), sequence);
        let invoice = Invoice::issue(
            order.id,
            number,
            order.total_amount,
            valid_from,
            valid_until,
            now,
        );

        // Under concurrent issuance the repository returns whichever row won
        self.invoices.create_if_absent(invoice).await
    }

    /// Sends the documents by email. Soft-fails: missing configuration or a
    /// send failure reports `false`, never an error.
    async fn notify_customer(
        &self,
        order: &Order,
        invoice: &Invoice,
        invoice_bytes: Vec<u8>,
        contract_bytes: Vec<u8>,
        actor: &Actor,
    ) -> bool {
        let Some(mailer) = &self.mailer else {
            tracing::info!(order_id = %order.id, "email service not configured, skipping notification");
            record_or_log(
                self.audit.as_ref(),
                AuditEntry::new(order.id, AuditAction::EmailSkipped, actor.clone())
                    .with_detail(serde_json::json!({ "reason": "email service not configured" })),
            )
            .await;
            return false;
        };

        let email = OutgoingEmail {
            to: order.customer_email.clone(),
            subject: format!("Your annual maintenance contract - {}", invoice.number),
            body: format!(
                "Dear {},\n\n\
                 Thank you for your payment. Your annual maintenance contract is now active.\n\n\
                 Invoice number: {}\n\
                 Amount: {}\n\
                 Valid from {} to {}\n\n\
                 Your invoice and contract are attached.\n\n\
                 Regards,\n{}",
                order.customer_name,
                invoice.number,
                format_paise(invoice.amount),
                invoice.valid_from.format("%d %b %Y"),
                invoice.valid_until.format("%d %b %Y"),
                self.company.name,
            ),
            attachments: vec![
                Attachment {
                    filename: format!("{}.txt", invoice.number),
                    content_type: "text/plain".to_string(),
                    bytes: invoice_bytes,
                },
                Attachment {
                    filename: format!("contract-{}.txt", order.order_number),
                    content_type: "text/plain".to_string(),
                    bytes: contract_bytes,
                },
            ],
        };

        match mailer.send(email).await {
            Ok(()) => {
                record_or_log(
                    self.audit.as_ref(),
                    AuditEntry::new(order.id, AuditAction::DocumentsEmailed, actor.clone())
                        .with_detail(serde_json::json!({
                            "to": order.customer_email,
                            "invoice_number": invoice.number.as_str(),
                        })),
                )
                .await;
                true
            }
            Err(err) => {
                tracing::warn!(order_id = %order.id, error = %err, "failed to send document email");
                record_or_log(
                    self.audit.as_ref(),
                    AuditEntry::new(order.id, AuditAction::EmailSkipped, actor.clone())
                        .with_detail(serde_json::json!({ "reason": err.to_string() })),
                )
                .await;
                false
            }
        }
    }
}
