//! PostgreSQL implementation of InvoiceRepository.
//!
//! The UNIQUE(order_id) constraint backs the lookup-before-insert pattern:
//! `create_if_absent` uses `ON CONFLICT DO NOTHING` and re-reads the winning
//! row, so concurrent issuance for the same order converges on one invoice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::invoice::{Invoice, InvoiceNumber, InvoiceStatus};
use crate::ports::{InvoiceRepository, StoreError};

pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    order_id: Uuid,
    number: String,
    amount: i64,
    status: String,
    issued_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    invoice_url: Option<String>,
    contract_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = StoreError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: row.id,
            order_id: row.order_id,
            number: InvoiceNumber::from_stored(row.number),
            amount: row.amount,
            status: parse_status(&row.status)?,
            issued_at: row.issued_at,
            due_at: row.due_at,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            invoice_url: row.invoice_url,
            contract_url: row.contract_url,
            created_at: row.created_at,
        })
    }
}

fn parse_status(s: &str) -> Result<InvoiceStatus, StoreError> {
    match s {
        "sent" => Ok(InvoiceStatus::Sent),
        "paid" => Ok(InvoiceStatus::Paid),
        "overdue" => Ok(InvoiceStatus::Overdue),
        "cancelled" => Ok(InvoiceStatus::Cancelled),
        other => Err(StoreError::Database(format!(
            "invalid invoice status value: {}",
            other
        ))),
    }
}

const SELECT_COLUMNS: &str = "id, order_id, number, amount, status, issued_at, due_at, \
                              valid_from, valid_until, invoice_url, contract_url, created_at";

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn find_by_order_id(&self, order_id: Uuid) -> Result<Option<Invoice>, StoreError> {
        let row: Option<InvoiceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM invoices WHERE order_id = $1",
            SELECT_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(Invoice::try_from).transpose()
    }

    async fn next_sequence_value(&self) -> Result<i64, StoreError> {
        let (value,): (i64,) = sqlx::query_as("SELECT nextval('invoice_number_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::database)?;
        Ok(value)
    }

    async fn create_if_absent(&self, invoice: Invoice) -> Result<Invoice, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (id, order_id, number, amount, status, issued_at, due_at,
                                  valid_from, valid_until, invoice_url, contract_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (order_id) DO NOTHING
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.order_id)
        .bind(invoice.number.as_str())
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.issued_at)
        .bind(invoice.due_at)
        .bind(invoice.valid_from)
        .bind(invoice.valid_until)
        .bind(&invoice.invoice_url)
        .bind(&invoice.contract_url)
        .bind(invoice.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database)?;

        // Return whichever row won, ours or a concurrent writer's
        self.find_by_order_id(invoice.order_id)
            .await?
            .ok_or(StoreError::NotFound("invoice"))
    }

    async fn update_document_urls(
        &self,
        invoice_id: Uuid,
        invoice_url: &str,
        contract_url: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE invoices SET invoice_url = $2, contract_url = $3 WHERE id = $1",
        )
        .bind(invoice_id)
        .bind(invoice_url)
        .bind(contract_url)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("invoice"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_invoice_statuses() {
        assert_eq!(parse_status("sent").unwrap(), InvoiceStatus::Sent);
        assert_eq!(parse_status("paid").unwrap(), InvoiceStatus::Paid);
        assert_eq!(parse_status("overdue").unwrap(), InvoiceStatus::Overdue);
        assert_eq!(parse_status("cancelled").unwrap(), InvoiceStatus::Cancelled);
        assert!(parse_status("draft").is_err());
    }
}
