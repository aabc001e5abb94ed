//! PostgreSQL implementation of AuditLog. Insert-only, no updates.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::audit::AuditEntry;
use crate::ports::{AuditLog, StoreError};

pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn append(&self, entry: AuditEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, order_id, gateway_order_id, gateway_payment_id,
                                   amount, action, detail, actor, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id)
        .bind(entry.order_id)
        .bind(&entry.gateway_order_id)
        .bind(&entry.gateway_payment_id)
        .bind(entry.amount)
        .bind(entry.action.as_str())
        .bind(&entry.detail)
        .bind(entry.actor.as_str())
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database)?;

        Ok(())
    }
}
