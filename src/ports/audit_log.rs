//! AuditLog port.

use async_trait::async_trait;

use crate::domain::audit::AuditEntry;

use super::StoreError;

/// Append-only audit trail. Entries are never mutated or deleted.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<(), StoreError>;
}

/// Appends an entry, routing failures to the log instead of the caller.
///
/// Audit is observability, not a transactional dependency: an append failure
/// must never abort the primary operation.
pub async fn record_or_log(audit: &dyn AuditLog, entry: AuditEntry) {
    let action = entry.action;
    let order_id = entry.order_id;
    if let Err(err) = audit.append(entry).await {
        tracing::error!(
            action = action.as_str(),
            %order_id,
            error = %err,
            "failed to append audit entry"
        );
    }
}
