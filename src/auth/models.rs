//! Domain records owned by the external user store.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// A user row as read from the store.
///
/// The authentication core only mutates `access_token`, `game_id`,
/// `last_login_ip`, `last_login_at`, and the recovery-code set; everything
/// else is read-only here.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub access_token: Option<String>,
    /// Presence means a second factor is required to authenticate.
    pub two_factor_secret: Option<String>,
    /// Single-use fallback codes; each is replaced on consumption.
    pub recovery_codes: Vec<String>,
    pub ban: Option<Ban>,
    /// Assigned once on first successful authentication, immutable after.
    pub game_id: Option<Uuid>,
    pub last_login_ip: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Account-level ban; blocks every authentication attempt.
#[derive(Debug, Clone)]
pub struct Ban {
    pub reason: String,
}

/// Authentication events recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    Verified,
    Logout,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "users.auth.api.login",
            Self::Verified => "users.auth.api.verified",
            Self::Logout => "users.auth.api.logout",
        }
    }
}

/// Immutable audit record; created by the logger, never updated or deleted.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub user_id: Uuid,
    pub action: AuditAction,
    /// Always `None` for authentication events.
    pub target_id: Option<Uuid>,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}
