//! Invoice metadata and invoice-number minting.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days after issue before an invoice falls due.
pub const DUE_DAYS: i64 = 15;

/// Status of an issued invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

/// Globally-unique, human-readable invoice number.
///
/// Format: `INV-YYYYMMDD-NNNN` where `NNNN` comes from a monotonically
/// increasing store-level sequence. Once assigned to an invoice, the number
/// is never regenerated; document regeneration replaces bytes and URLs only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Mints a new number from the issue date and a sequence value.
    pub fn mint(date: NaiveDate, sequence: i64) -> Self {
        Self(format!("INV-{}-{:04}", date.format("%Y%m%d"), sequence))
    }

    /// Wraps a number previously persisted by this system.
    pub fn from_stored(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Financial document metadata, one per successfully paid order.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: Uuid,
    pub order_id: Uuid,
    pub number: InvoiceNumber,
    /// Amount in paise, mirroring the captured amount on the order.
    pub amount: i64,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    /// Mirrors the subscription validity window.
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub invoice_url: Option<String>,
    pub contract_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Builds a fresh invoice for an order at issue time.
    pub fn issue(
        order_id: Uuid,
        number: InvoiceNumber,
        amount: i64,
        valid_from: DateTime<Utc>,
        valid_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            number,
            amount,
            status: InvoiceStatus::Sent,
            issued_at: now,
            due_at: now + Duration::days(DUE_DAYS),
            valid_from,
            valid_until,
            invoice_url: None,
            contract_url: None,
            created_at: now,
        }
    }
}
