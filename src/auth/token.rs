//! Access token generation and persistence.
//!
//! Tokens are opaque 128-character alphanumeric strings drawn from the OS
//! CSPRNG (just over 760 bits). The store enforces uniqueness; a collision
//! triggers a bounded retry with a fresh token before surfacing as fatal.

use anyhow::anyhow;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use uuid::Uuid;

use super::error::AuthError;
use super::models::User;
use super::store::{TokenWrite, UserStore};

/// Length of an issued access token, in characters.
pub const TOKEN_LENGTH: usize = 128;

const ISSUE_ATTEMPTS: usize = 3;

/// Result of issuing a token: the token itself plus the user's permanent
/// game id (assigned here on first authentication).
#[derive(Debug)]
pub(super) struct IssuedToken {
    pub(super) token: String,
    pub(super) game_id: Uuid,
}

pub(super) fn generate_access_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Issue a fresh token for `user`, replacing any previous one.
///
/// The previous token becomes invalid immediately; there is at most one
/// active session per user. This is the final mutating step of a successful
/// authentication, so a request that dies earlier leaves no orphaned token.
pub(super) async fn issue(store: &dyn UserStore, user: &User) -> Result<IssuedToken, AuthError> {
    let game_id = match user.game_id {
        Some(id) => id,
        None => store.assign_game_id(user.id, Uuid::new_v4()).await?,
    };

    for _ in 0..ISSUE_ATTEMPTS {
        let token = generate_access_token();
        match store.set_access_token(user.id, &token).await? {
            TokenWrite::Stored => return Ok(IssuedToken { token, game_id }),
            TokenWrite::Collision => {}
        }
    }

    Err(AuthError::Store(anyhow!(
        "failed to generate a unique access token after {ISSUE_ATTEMPTS} attempts"
    )))
}

/// Clear `token` wherever it is held. No-op when no user holds it.
pub(super) async fn invalidate(
    store: &dyn UserStore,
    token: &str,
) -> Result<Option<Uuid>, AuthError> {
    Ok(store.clear_access_token(token).await?)
}
