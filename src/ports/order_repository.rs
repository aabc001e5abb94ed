//! OrderRepository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::Order;

use super::StoreError;

/// Persistence interface for orders.
///
/// The subscription activator is the sole writer of the activation fields;
/// unrelated staff workflows mutate other columns through their own paths.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Persists the activation fields: payment status, lifecycle status,
    /// validity window, gateway identifiers, and captured amount.
    async fn update_activation(&self, order: &Order) -> Result<(), StoreError>;
}
