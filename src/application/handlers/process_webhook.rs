//! ProcessWebhookHandler - reconciles verified gateway events.
//!
//! The pipeline runs per inbound delivery, concurrently and without ordering
//! guarantees. Correctness comes from "read current persisted state, then
//! decide": every path is safe to execute twice for the same gateway payment
//! identifier and converges to the same end state.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::audit::{Actor, AuditAction, AuditEntry};
use crate::domain::order::ValidityWindow;
use crate::domain::payment::PaymentState;
use crate::domain::webhook::{EventKind, GatewayEvent, PaymentEntity};
use crate::ports::{
    record_or_log, AuditLog, CaptureOutcome, OrderRepository, PaymentLedger, StoreError,
};

use super::issue_documents::{IssueDocumentsHandler, IssueError};

/// Errors from webhook processing.
///
/// At the HTTP boundary these are logged and acknowledged (the gateway only
/// ever sees accept/reject); the error type exists so tests and callers can
/// observe what failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Issue(#[from] IssueError),

    /// The ledger references an order row that no longer exists.
    #[error("ledger record references missing order {0}")]
    MissingOrder(Uuid),
}

/// Outcome of processing one verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The event changed state (activation, failure marking).
    Processed,
    /// Duplicate delivery; all side effects already happened.
    AlreadyProcessed,
    /// The event references an order this system never originated.
    UnknownOrder,
    /// Known event kind that triggers no writes (e.g. order.paid).
    Acknowledged,
    /// Unknown event kind, acknowledged for forward compatibility.
    Ignored(String),
}

/// Handler for verified gateway webhook events.
pub struct ProcessWebhookHandler {
    ledger: Arc<dyn PaymentLedger>,
    orders: Arc<dyn OrderRepository>,
    audit: Arc<dyn AuditLog>,
    issuance: Arc<IssueDocumentsHandler>,
}

impl ProcessWebhookHandler {
    pub fn new(
        ledger: Arc<dyn PaymentLedger>,
        orders: Arc<dyn OrderRepository>,
        audit: Arc<dyn AuditLog>,
        issuance: Arc<IssueDocumentsHandler>,
    ) -> Self {
        Self {
            ledger,
            orders,
            audit,
            issuance,
        }
    }

    /// Dispatches a parsed event to its handler.
    pub async fn handle(&self, event: &GatewayEvent) -> Result<WebhookOutcome, PipelineError> {
        match event.kind() {
            EventKind::PaymentCaptured => self.handle_captured(event).await,
            EventKind::PaymentFailed => self.handle_failed(event).await,
            EventKind::OrderPaid => {
                // Informational confirmation; capture handling already
                // performed activation.
                tracing::info!("order.paid event acknowledged without action");
                Ok(WebhookOutcome::Acknowledged)
            }
            EventKind::Unknown(kind) => {
                tracing::info!(event_kind = %kind, "ignoring unknown gateway event kind");
                Ok(WebhookOutcome::Ignored(kind))
            }
        }
    }

    async fn handle_captured(
        &self,
        event: &GatewayEvent,
    ) -> Result<WebhookOutcome, PipelineError> {
        let Some(payment) = event.payment() else {
            tracing::warn!("payment.captured event without payment entity");
            return Ok(WebhookOutcome::Ignored("missing payment entity".to_string()));
        };

        // Short-circuit on a payment id we have already fully processed:
        // activation, invoice issuance, and notification each happen exactly
        // once per payment.
        if let Some(existing) = self
            .ledger
            .find_by_gateway_payment_id(&payment.id)
            .await?
        {
            if existing.state == PaymentState::Captured {
                tracing::info!(
                    gateway_payment_id = %payment.id,
                    "duplicate capture delivery, already processed"
                );
                return Ok(WebhookOutcome::AlreadyProcessed);
            }
        }

        // The session record was created when checkout began; without one,
        // this event refers to an order we never originated.
        let Some(record) = self
            .ledger
            .find_by_gateway_order_id(&payment.order_id)
            .await?
        else {
            tracing::info!(
                gateway_order_id = %payment.order_id,
                "capture event for unknown checkout session, acknowledging"
            );
            return Ok(WebhookOutcome::UnknownOrder);
        };

        if record.state == PaymentState::Captured {
            return Ok(WebhookOutcome::AlreadyProcessed);
        }

        // Amount mismatch is an anomaly, not a blocker: record it and proceed.
        if payment.amount != record.expected_amount {
            tracing::warn!(
                gateway_order_id = %payment.order_id,
                expected = record.expected_amount,
                captured = payment.amount,
                "captured amount does not match expected amount"
            );
            record_or_log(
                self.audit.as_ref(),
                AuditEntry::new(record.order_id, AuditAction::AmountMismatch, Actor::Webhook)
                    .with_gateway_ids(Some(&payment.order_id), Some(&payment.id))
                    .with_amount(payment.amount)
                    .with_detail(serde_json::json!({
                        "expected": record.expected_amount,
                        "captured": payment.amount,
                    })),
            )
            .await;
        }

        let now = Utc::now();

        // Conditional transition closes the race between concurrent duplicate
        // deliveries: exactly one caller proceeds past this point.
        match self
            .ledger
            .mark_captured(record.id, &payment.id, now)
            .await?
        {
            CaptureOutcome::Captured => {}
            CaptureOutcome::AlreadyFinal => {
                return Ok(WebhookOutcome::AlreadyProcessed);
            }
        }

        self.activate_order(record.order_id, payment, now).await?;

        record_or_log(
            self.audit.as_ref(),
            AuditEntry::new(record.order_id, AuditAction::PaymentCaptured, Actor::Webhook)
                .with_gateway_ids(Some(&payment.order_id), Some(&payment.id))
                .with_amount(payment.amount)
                .with_detail(serde_json::json!({ "expected": record.expected_amount })),
        )
        .await;

        // Downstream issuance is idempotently retriable on redelivery; its
        // failure after this point leaves the ledger and order consistent.
        let issued = self
            .issuance
            .issue_for_order(record.order_id, Actor::Webhook)
            .await?;
        tracing::info!(
            order_id = %record.order_id,
            invoice_number = %issued.invoice_number,
            email_sent = issued.email_sent,
            "payment captured and documents issued"
        );

        Ok(WebhookOutcome::Processed)
    }

    /// Ledger transition and order activation form one logical unit: any
    /// failure here aborts before invoice issuance.
    async fn activate_order(
        &self,
        order_id: Uuid,
        payment: &PaymentEntity,
        now: chrono::DateTime<Utc>,
    ) -> Result<(), PipelineError> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(PipelineError::MissingOrder(order_id))?;

        let window = ValidityWindow::annual_from(now);
        order.activate(window, payment.amount, &payment.order_id, &payment.id, now);
        self.orders.update_activation(&order).await?;
        Ok(())
    }

    async fn handle_failed(&self, event: &GatewayEvent) -> Result<WebhookOutcome, PipelineError> {
        let Some(payment) = event.payment() else {
            tracing::warn!("payment.failed event without payment entity");
            return Ok(WebhookOutcome::Ignored("missing payment entity".to_string()));
        };

        let Some(record) = self
            .ledger
            .find_by_gateway_order_id(&payment.order_id)
            .await?
        else {
            tracing::info!(
                gateway_order_id = %payment.order_id,
                "failure event for unknown checkout session, acknowledging"
            );
            return Ok(WebhookOutcome::UnknownOrder);
        };

        if record.state.is_final() {
            return Ok(WebhookOutcome::AlreadyProcessed);
        }

        self.ledger.mark_failed(record.id).await?;

        record_or_log(
            self.audit.as_ref(),
            AuditEntry::new(record.order_id, AuditAction::PaymentFailed, Actor::Webhook)
                .with_gateway_ids(Some(&payment.order_id), Some(&payment.id))
                .with_amount(payment.amount)
                .with_detail(serde_json::Value::Null),
        )
        .await;

        tracing::info!(order_id = %record.order_id, "payment failure recorded");
        Ok(WebhookOutcome::Processed)
    }
}
