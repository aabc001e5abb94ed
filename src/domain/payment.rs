//! Payment ledger records: one row per payment-gateway checkout session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of a payment record.
///
/// Transitions only move forward: `Created -> Captured` or
/// `Created -> Failed`. A record already in `Captured` is never
/// re-processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Created,
    Captured,
    Failed,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Created => "created",
            PaymentState::Captured => "captured",
            PaymentState::Failed => "failed",
        }
    }

    /// Whether the record has reached a terminal state.
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentState::Created)
    }
}

/// Durable record of one checkout session against the payment gateway.
///
/// Created when checkout begins (outside this core) and keyed by the
/// gateway's order identifier. The ledger is the sole writer of `state`.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub id: Uuid,
    /// The internal order this session pays for.
    pub order_id: Uuid,
    /// The gateway's order identifier, assigned when checkout was opened.
    pub gateway_order_id: String,
    /// Amount in paise the session was opened for.
    pub expected_amount: i64,
    pub state: PaymentState,
    /// The gateway's payment identifier, stamped on capture.
    pub gateway_payment_id: Option<String>,
    /// When the capture event passed signature verification.
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
