use thiserror::Error;

/// Expected, caller-recoverable authentication failures.
///
/// Every variant except `Store` is surfaced verbatim in the response
/// envelope; `Store` covers connectivity and constraint failures and maps to
/// a generic internal error.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier and wrong password are deliberately the same
    /// variant so callers cannot tell accounts apart.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user banned: {reason}")]
    Banned { reason: String },
    #[error("missing 2FA code")]
    MissingTwoFactor,
    #[error("invalid 2FA code")]
    InvalidTwoFactor,
    #[error("invalid token")]
    InvalidToken,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
