//! Second-factor validation: TOTP with a single-use recovery fallback.
//!
//! The stored secret is a base32 TOTP seed (SHA1, 6 digits, 30s step). When
//! the time-based check fails, the code is tried against the recovery set;
//! a match consumes the code and replaces it with a fresh one in the same
//! store write, so a code can never be spent twice.

use rand::{rngs::OsRng, RngCore};
use totp_rs::{Algorithm, Secret, TOTP};

use super::error::AuthError;
use super::models::User;
use super::store::UserStore;

const RECOVERY_CODE_LEN: usize = 12;
const RECOVERY_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// How a two-factor requirement was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TwoFactorStatus {
    NotEnrolled,
    Totp,
    RecoveryCode,
}

impl TwoFactorStatus {
    /// Audit value: "on" when the account has a second factor at all.
    pub(super) const fn audit_value(self) -> &'static str {
        match self {
            Self::NotEnrolled => "off",
            Self::Totp | Self::RecoveryCode => "on",
        }
    }
}

/// Enforce the second factor for `user`, if enrolled.
///
/// Missing or empty codes are rejected before any validation so the caller
/// can prompt for one.
pub(super) async fn require(
    store: &dyn UserStore,
    user: &User,
    code: Option<&str>,
) -> Result<TwoFactorStatus, AuthError> {
    let Some(secret) = user.two_factor_secret.as_deref() else {
        return Ok(TwoFactorStatus::NotEnrolled);
    };

    let Some(code) = code.map(str::trim).filter(|code| !code.is_empty()) else {
        return Err(AuthError::MissingTwoFactor);
    };

    if valid_totp(secret, code) {
        return Ok(TwoFactorStatus::Totp);
    }

    // The store swaps the code for a fresh one in a single conditional
    // write; a false return means it was never issued or already spent.
    let replacement = generate_recovery_code();
    if store
        .replace_recovery_code(user.id, code, &replacement)
        .await?
    {
        return Ok(TwoFactorStatus::RecoveryCode);
    }

    Err(AuthError::InvalidTwoFactor)
}

/// Check a code against a base32 secret for the current time step.
/// Malformed secrets fail closed.
fn valid_totp(secret: &str, code: &str) -> bool {
    let Ok(bytes) = Secret::Encoded(secret.to_string()).to_bytes() else {
        return false;
    };
    let Ok(totp) = TOTP::new(Algorithm::SHA1, 6, 1, 30, bytes) else {
        return false;
    };
    totp.check_current(code).unwrap_or(false)
}

fn generate_recovery_code() -> String {
    let mut rng = OsRng;
    (0..RECOVERY_CODE_LEN)
        .map(|_| {
            let idx = rng.next_u32() as usize % RECOVERY_CODE_ALPHABET.len();
            RECOVERY_CODE_ALPHABET[idx] as char
        })
        .collect()
}
