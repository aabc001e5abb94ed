//! Gateway event payload parsing.
//!
//! Events arrive as JSON with a string `event` discriminator and a nested
//! payload. Unknown event kinds are preserved rather than rejected so new
//! gateway event types never cause retry storms.

use serde::{Deserialize, Serialize};

/// The event kinds this pipeline acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Funds were collected for a payment.
    PaymentCaptured,
    /// A capture attempt failed.
    PaymentFailed,
    /// The gateway considers the order fully paid. Informational only;
    /// capture handling already performs activation.
    OrderPaid,
    /// Any event type this system does not handle.
    Unknown(String),
}

impl EventKind {
    pub fn from_str(kind: &str) -> Self {
        match kind {
            "payment.captured" => EventKind::PaymentCaptured,
            "payment.failed" => EventKind::PaymentFailed,
            "order.paid" => EventKind::OrderPaid,
            other => EventKind::Unknown(other.to_string()),
        }
    }
}

/// The payment entity embedded in payment events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntity {
    /// Gateway payment identifier (e.g. "pay_K2j9...").
    pub id: String,
    /// Gateway order identifier the payment belongs to.
    pub order_id: String,
    /// Amount in paise as reported by the gateway.
    pub amount: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub payment: Option<PaymentEntity>,
}

/// A verified, parsed gateway notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayEvent {
    pub event: String,
    #[serde(default)]
    pub payload: EventPayload,
}

impl GatewayEvent {
    /// Parses the raw (already verified) body bytes.
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn kind(&self) -> EventKind {
        EventKind::from_str(&self.event)
    }

    /// The payment entity, present on `payment.*` events.
    pub fn payment(&self) -> Option<&PaymentEntity> {
        self.payload.payment.as_ref()
    }
}
