//! Authentication orchestration.
//!
//! `AuthService` wires the pipeline together and owns the ordering
//! guarantees: credentials are checked first, bans win over everything after
//! that (a banned user is never prompted for a second factor), and the token
//! write is the last mutating step before bookkeeping.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use super::audit;
use super::credentials;
use super::error::AuthError;
use super::models::{AuditAction, User};
use super::store::UserStore;
use super::token;
use super::two_factor;

/// Stateless orchestrator over a shared user store.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Authenticate with an identifier (email or name) and password, plus an
    /// optional second-factor code. On success the returned user carries the
    /// freshly issued access token and game id.
    ///
    /// # Errors
    /// `InvalidCredentials`, `Banned`, `MissingTwoFactor`, `InvalidTwoFactor`
    /// for expected failures; `Store` for store-level faults.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
        code: Option<&str>,
        ip: Option<&str>,
    ) -> Result<User, AuthError> {
        let store = self.store.as_ref();

        let user = credentials::verify(store, identifier, password).await?;
        ban_gate(&user)?;
        let two_factor = two_factor::require(store, &user, code).await?;
        let issued = token::issue(store, &user).await?;

        let now = Utc::now();
        store.update_last_login(user.id, ip, now).await?;
        audit::record(
            store,
            user.id,
            AuditAction::Login,
            json!({ "ip": ip, "2fa": two_factor.audit_value() }),
        )
        .await;

        let mut user = user;
        user.access_token = Some(issued.token);
        user.game_id = Some(issued.game_id);
        user.last_login_ip = ip.map(ToString::to_string);
        user.last_login_at = Some(now);
        Ok(user)
    }

    /// Resolve an access token back to its user. The token stays valid.
    ///
    /// # Errors
    /// `InvalidToken` when no user holds the token, `Banned` when its owner
    /// is banned, `Store` for store-level faults.
    pub async fn verify(&self, access_token: &str, ip: Option<&str>) -> Result<User, AuthError> {
        let store = self.store.as_ref();

        let Some(user) = store.find_by_access_token(access_token).await? else {
            return Err(AuthError::InvalidToken);
        };
        ban_gate(&user)?;

        let now = Utc::now();
        store.update_last_login(user.id, ip, now).await?;
        audit::record(store, user.id, AuditAction::Verified, json!({ "ip": ip })).await;

        let mut user = user;
        user.last_login_ip = ip.map(ToString::to_string);
        user.last_login_at = Some(now);
        Ok(user)
    }

    /// Invalidate an access token. Idempotent: succeeds whether or not any
    /// user held the token.
    ///
    /// # Errors
    /// Only `Store` faults; a missing token is not an error.
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let store = self.store.as_ref();

        if let Some(user_id) = token::invalidate(store, access_token).await? {
            audit::record(store, user_id, AuditAction::Logout, json!({})).await;
        }
        Ok(())
    }
}

/// A ban blocks everything past the credential check, including the 2FA
/// prompt, on both the authenticate and verify paths.
fn ban_gate(user: &User) -> Result<(), AuthError> {
    match &user.ban {
        Some(ban) => Err(AuthError::Banned {
            reason: ban.reason.clone(),
        }),
        None => Ok(()),
    }
}
