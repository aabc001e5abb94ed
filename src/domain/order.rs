//! Order aggregate: one customer's annual-service agreement.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the subscription validity window in days.
pub const VALIDITY_DAYS: i64 = 365;

/// Whether the order's payment has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// Lifecycle status of the service agreement.
///
/// Orders are never deleted; `Inactive` and `Cancelled` are soft states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Active,
    Inactive,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Active => "active",
            OrderStatus::Inactive => "inactive",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// The date range during which an activated subscription entitles the
/// customer to service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl ValidityWindow {
    /// Computes the annual window `[now, now + 365 days)`.
    pub fn annual_from(now: DateTime<Utc>) -> Self {
        Self {
            starts_at: now,
            ends_at: now + Duration::days(VALIDITY_DAYS),
        }
    }
}

/// One customer's annual-service agreement.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    /// Human-readable order number shown on documents (e.g. "ORD-1042").
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    /// Customer's stated usage purpose, interpolated into the contract's
    /// scope-of-services paragraph.
    pub usage_purpose: String,
    /// Number of appliances covered by the agreement.
    pub item_count: i32,
    /// Total amount in paise. After activation this holds the amount the
    /// gateway actually captured, so documents reflect what was charged.
    pub total_amount: i64,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Activates the subscription after a successful capture.
    ///
    /// Records the captured amount (not merely the expected amount) and
    /// attaches the gateway identifiers for traceability.
    pub fn activate(
        &mut self,
        window: ValidityWindow,
        captured_amount: i64,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        now: DateTime<Utc>,
    ) {
        self.payment_status = PaymentStatus::Paid;
        self.status = OrderStatus::Active;
        self.valid_from = Some(window.starts_at);
        self.valid_until = Some(window.ends_at);
        self.total_amount = captured_amount;
        self.gateway_order_id = Some(gateway_order_id.to_string());
        self.gateway_payment_id = Some(gateway_payment_id.to_string());
        self.updated_at = now;
    }
}
