//! PostgreSQL implementation of OrderRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus, PaymentStatus};
use crate::ports::{OrderRepository, StoreError};

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    customer_address: String,
    usage_purpose: String,
    item_count: i32,
    total_amount: i64,
    payment_status: String,
    status: String,
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
    gateway_order_id: Option<String>,
    gateway_payment_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            order_number: row.order_number,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            customer_address: row.customer_address,
            usage_purpose: row.usage_purpose,
            item_count: row.item_count,
            total_amount: row.total_amount,
            payment_status: parse_payment_status(&row.payment_status)?,
            status: parse_status(&row.status)?,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, StoreError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        other => Err(StoreError::Database(format!(
            "invalid payment_status value: {}",
            other
        ))),
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, StoreError> {
    match s {
        "new" => Ok(OrderStatus::New),
        "active" => Ok(OrderStatus::Active),
        "inactive" => Ok(OrderStatus::Inactive),
        "cancelled" => Ok(OrderStatus::Cancelled),
        other => Err(StoreError::Database(format!(
            "invalid order status value: {}",
            other
        ))),
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, order_number, customer_name, customer_email, customer_phone,
                   customer_address, usage_purpose, item_count, total_amount,
                   payment_status, status, valid_from, valid_until,
                   gateway_order_id, gateway_payment_id, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(Order::try_from).transpose()
    }

    async fn update_activation(&self, order: &Order) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET payment_status = $2,
                status = $3,
                valid_from = $4,
                valid_until = $5,
                total_amount = $6,
                gateway_order_id = $7,
                gateway_payment_id = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(order.id)
        .bind(order.payment_status.as_str())
        .bind(order.status.as_str())
        .bind(order.valid_from)
        .bind(order.valid_until)
        .bind(order.total_amount)
        .bind(&order.gateway_order_id)
        .bind(&order.gateway_payment_id)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("order"));
        }
        Ok(())
    }
}
