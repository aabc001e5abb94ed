//! ObjectStore port: document persistence and signed retrieval URLs.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains path traversal or other disallowed components.
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// The underlying storage operation failed.
    #[error("storage I/O error: {0}")]
    Io(String),
}

impl StorageError {
    pub fn io(err: impl std::fmt::Display) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Port for persisting generated documents and minting retrieval URLs.
///
/// `put` overwrites: regeneration replaces the object at a path, it never
/// duplicates it. Keys are namespaced by order id
/// (`orders/{order_id}/invoice.txt`).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes the object, replacing any prior object at the same key.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Mints a time-limited signed URL granting read access to the object.
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;
}
