//! Authentication endpoints for game servers.
//!
//! Three POST routes share one state: `/auth/authenticate` trades credentials
//! (plus a second factor once enrolled) for an access token,
//! `/auth/verify` resolves a held token back to the profile, and
//! `/auth/logout` invalidates a token. All three sit behind a feature flag
//! checked before anything else.

pub(crate) mod authenticate;
pub(crate) mod session;
pub(crate) mod state;
pub(crate) mod types;
mod utils;

pub use authenticate::authenticate;
pub use session::{logout, verify};
pub use state::{AuthConfig, AuthState};
