//! PaymentLedger port: the durable, idempotent record of gateway sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::payment::PaymentRecord;

use super::StoreError;

/// Result of attempting to mark a record captured.
///
/// Implementations must make the transition conditional on the record still
/// being in its initial state, so concurrent duplicate deliveries converge:
/// exactly one caller observes [`CaptureOutcome::Captured`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// This caller performed the transition.
    Captured,
    /// The record had already reached a final state.
    AlreadyFinal,
}

/// Persistence interface for payment records.
///
/// The ledger is the sole writer of payment state. State only moves forward
/// (`created -> captured | failed`).
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Looks up a record by the gateway's payment identifier (set on capture).
    async fn find_by_gateway_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError>;

    /// Looks up a record by the gateway's order identifier (set at checkout).
    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError>;

    /// Transitions `created -> captured`, stamping the gateway payment id and
    /// verification time. Returns [`CaptureOutcome::AlreadyFinal`] if the
    /// record was no longer in `created`.
    async fn mark_captured(
        &self,
        record_id: Uuid,
        gateway_payment_id: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<CaptureOutcome, StoreError>;

    /// Transitions `created -> failed`. A record already in a final state is
    /// left untouched.
    async fn mark_failed(&self, record_id: Uuid) -> Result<(), StoreError>;
}
