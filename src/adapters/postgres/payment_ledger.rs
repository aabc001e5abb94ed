//! PostgreSQL implementation of PaymentLedger.
//!
//! Forward-only state transitions are enforced with conditional UPDATEs
//! (`WHERE state = 'created'`), so concurrent duplicate deliveries race on
//! the database row itself: exactly one wins the capture.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::payment::{PaymentRecord, PaymentState};
use crate::ports::{CaptureOutcome, PaymentLedger, StoreError};

pub struct PostgresPaymentLedger {
    pool: PgPool,
}

impl PostgresPaymentLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    order_id: Uuid,
    gateway_order_id: String,
    expected_amount: i64,
    state: String,
    gateway_payment_id: Option<String>,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = StoreError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(PaymentRecord {
            id: row.id,
            order_id: row.order_id,
            gateway_order_id: row.gateway_order_id,
            expected_amount: row.expected_amount,
            state: parse_state(&row.state)?,
            gateway_payment_id: row.gateway_payment_id,
            verified_at: row.verified_at,
            created_at: row.created_at,
        })
    }
}

fn parse_state(s: &str) -> Result<PaymentState, StoreError> {
    match s {
        "created" => Ok(PaymentState::Created),
        "captured" => Ok(PaymentState::Captured),
        "failed" => Ok(PaymentState::Failed),
        other => Err(StoreError::Database(format!(
            "invalid payment state value: {}",
            other
        ))),
    }
}

const SELECT_COLUMNS: &str = "id, order_id, gateway_order_id, expected_amount, state, \
                              gateway_payment_id, verified_at, created_at";

#[async_trait]
impl PaymentLedger for PostgresPaymentLedger {
    async fn find_by_gateway_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_records WHERE gateway_payment_id = $1",
            SELECT_COLUMNS
        ))
        .bind(gateway_payment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(PaymentRecord::try_from).transpose()
    }

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_records WHERE gateway_order_id = $1",
            SELECT_COLUMNS
        ))
        .bind(gateway_order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(PaymentRecord::try_from).transpose()
    }

    async fn mark_captured(
        &self,
        record_id: Uuid,
        gateway_payment_id: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<CaptureOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_records
            SET state = 'captured',
                gateway_payment_id = $2,
                verified_at = $3
            WHERE id = $1 AND state = 'created'
            "#,
        )
        .bind(record_id)
        .bind(gateway_payment_id)
        .bind(verified_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database)?;

        if result.rows_affected() == 1 {
            Ok(CaptureOutcome::Captured)
        } else {
            Ok(CaptureOutcome::AlreadyFinal)
        }
    }

    async fn mark_failed(&self, record_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE payment_records
            SET state = 'failed'
            WHERE id = $1 AND state = 'created'
            "#,
        )
        .bind(record_id)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database)?;

        Ok(())
    }
}
