//! Append-only audit trail entries.
//!
//! Every state-changing action in the pipeline appends one entry, including
//! anomalies that do not block processing. Entries are never mutated or
//! deleted; they carry enough structured detail to reconstruct what happened
//! without re-deriving it from mutable rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action tags for audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    PaymentCaptured,
    PaymentFailed,
    AmountMismatch,
    DocumentsGenerated,
    DocumentsEmailed,
    EmailSkipped,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::PaymentCaptured => "payment_captured",
            AuditAction::PaymentFailed => "payment_failed",
            AuditAction::AmountMismatch => "amount_mismatch",
            AuditAction::DocumentsGenerated => "documents_generated",
            AuditAction::DocumentsEmailed => "documents_emailed",
            AuditAction::EmailSkipped => "email_skipped",
        }
    }
}

/// Who performed the audited action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// The inbound gateway webhook pipeline.
    Webhook,
    /// An internal non-interactive process.
    System,
    /// A staff member, identified by their staff id.
    Staff(String),
}

impl Actor {
    pub fn as_str(&self) -> &str {
        match self {
            Actor::Webhook => "webhook",
            Actor::System => "system",
            Actor::Staff(id) => id.as_str(),
        }
    }
}

/// One immutable audit fact.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: Uuid,
    pub order_id: Uuid,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    /// Monetary amount in paise, where the action concerns one.
    pub amount: Option<i64>,
    pub action: AuditAction,
    /// Free-form structured detail.
    pub detail: serde_json::Value,
    pub actor: Actor,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(order_id: Uuid, action: AuditAction, actor: Actor) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            gateway_order_id: None,
            gateway_payment_id: None,
            amount: None,
            action,
            detail: serde_json::Value::Null,
            actor,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_gateway_ids(
        mut self,
        gateway_order_id: Option<&str>,
        gateway_payment_id: Option<&str>,
    ) -> Self {
        self.gateway_order_id = gateway_order_id.map(str::to_string);
        self.gateway_payment_id = gateway_payment_id.map(str::to_string);
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = detail;
        self
    }
}
