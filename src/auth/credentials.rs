//! Credential verification: identifier resolution and password checks.
//!
//! The login identifier doubles as email or account name; anything containing
//! `@` is looked up by email, everything else by name. Password hashes are
//! Argon2id PHC strings verified with the `argon2` crate.

use anyhow::{anyhow, Result};
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

use super::error::AuthError;
use super::models::User;
use super::store::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum IdentifierField {
    Email,
    Name,
}

pub(super) fn identifier_field(identifier: &str) -> IdentifierField {
    if identifier.contains('@') {
        IdentifierField::Email
    } else {
        IdentifierField::Name
    }
}

/// Resolve the identifier and check the password.
///
/// Unknown identifier and wrong password both return
/// [`AuthError::InvalidCredentials`]; the unknown-identifier path still runs
/// one Argon2 hashing round so the two failures take the same time.
pub(super) async fn verify(
    store: &dyn UserStore,
    identifier: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = match identifier_field(identifier) {
        IdentifierField::Email => store.find_by_email(identifier).await?,
        IdentifierField::Name => store.find_by_name(identifier).await?,
    };

    let Some(user) = user else {
        let _ = hash_password(password);
        return Err(AuthError::InvalidCredentials);
    };

    if verify_password(&user.password_hash, password) {
        Ok(user)
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

fn verify_password(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Hash a password as an Argon2id PHC string.
///
/// The service itself never creates accounts; this is the primitive the
/// surrounding user management is expected to use.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| anyhow!("failed to hash password"))
}
