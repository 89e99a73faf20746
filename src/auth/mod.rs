//! Token-based authentication core.
//!
//! The flow is a fixed pipeline with short-circuit on first failure:
//!
//! credentials -> ban gate -> second factor (when enrolled) -> token issue
//! -> last-login update -> audit.
//!
//! Every step reaches the user store only through the [`UserStore`] trait, so
//! the orchestration carries no hidden global state and can be exercised
//! against an in-memory store in tests. The two operations that need
//! atomicity, token issuance and recovery-code consumption, are delegated to
//! the store as single conditional writes.

mod audit;
mod credentials;
mod error;
#[cfg(test)]
pub(crate) mod memory;
mod models;
mod service;
mod storage;
mod store;
mod token;
mod two_factor;

pub use credentials::hash_password;
pub use error::AuthError;
pub use models::{AuditAction, AuditEntry, Ban, User};
pub use service::AuthService;
pub use storage::PgUserStore;
pub use store::{TokenWrite, UserStore};
pub use token::TOKEN_LENGTH;
