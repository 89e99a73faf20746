//! Best-effort audit trail for authentication events.

use chrono::Utc;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use super::models::{AuditAction, AuditEntry};
use super::store::UserStore;

/// Append an audit entry, swallowing store failures.
///
/// Auditing must never roll back or fail an authentication that already
/// succeeded; a failed write is logged and the flow continues.
pub(super) async fn record(store: &dyn UserStore, user_id: Uuid, action: AuditAction, data: Value) {
    let entry = AuditEntry {
        user_id,
        action,
        target_id: None,
        data,
        timestamp: Utc::now(),
    };

    if let Err(err) = store.record_audit(entry).await {
        warn!("Failed to record audit entry {}: {err}", action.as_str());
    }
}
