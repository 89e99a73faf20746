//! Store seam between the authentication core and the persistence engine.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::{AuditEntry, User};

/// Outcome of persisting a freshly generated access token.
#[derive(Debug)]
pub enum TokenWrite {
    Stored,
    /// Another user already holds this token; the caller retries with a
    /// fresh one.
    Collision,
}

/// Repository interface over the external user store.
///
/// Implementations must make `set_access_token`, `assign_game_id`, and
/// `replace_recovery_code` atomic per user: concurrent callers must not both
/// consume the same recovery code, assign two game ids, or end up with two
/// users sharing a token.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<User>>;

    async fn find_by_access_token(&self, token: &str) -> Result<Option<User>>;

    /// Persist `token` for `user_id`, replacing any previous token. Returns
    /// [`TokenWrite::Collision`] when the token is already held elsewhere.
    async fn set_access_token(&self, user_id: Uuid, token: &str) -> Result<TokenWrite>;

    /// Clear the token wherever it is held, returning the owner's id when a
    /// row matched. Never an error when no user holds the token.
    async fn clear_access_token(&self, token: &str) -> Result<Option<Uuid>>;

    /// Set `game_id` only when still null, returning the authoritative value
    /// afterwards. An existing id is never overwritten.
    async fn assign_game_id(&self, user_id: Uuid, game_id: Uuid) -> Result<Uuid>;

    /// Atomically swap `used` for `replacement` in the recovery-code set.
    /// Returns false when `used` was not present (already spent or never
    /// issued), in which case nothing is written.
    async fn replace_recovery_code(
        &self,
        user_id: Uuid,
        used: &str,
        replacement: &str,
    ) -> Result<bool>;

    async fn update_last_login(
        &self,
        user_id: Uuid,
        ip: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Append an audit entry. Callers treat failures as non-fatal.
    async fn record_audit(&self, entry: AuditEntry) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::TokenWrite;

    #[test]
    fn token_write_debug_names() {
        assert_eq!(format!("{:?}", TokenWrite::Stored), "Stored");
        assert_eq!(format!("{:?}", TokenWrite::Collision), "Collision");
    }
}
