//! # Tessera (Token-Based Player Authentication)
//!
//! `tessera` authenticates game launchers and game servers against the site's
//! user accounts. Clients trade credentials for an opaque access token, then
//! present that token to resolve or drop the session.
//!
//! ## Authentication Flow
//!
//! `POST /auth/authenticate` verifies the email-or-name identifier and
//! password, refuses banned accounts, and enforces a second factor (TOTP or a
//! single-use recovery code) once the account is enrolled. On success it
//! issues a fresh 128-character alphanumeric access token, replacing any
//! previous one, so at most one session is live per account.
//!
//! ## Game Identity
//!
//! The first successful login permanently assigns a `game_id` UUID. It never
//! changes afterwards, which lets game servers key player data on it across
//! password and email changes.
//!
//! ## Tokens
//!
//! Tokens are opaque and stored server-side. `POST /auth/verify` resolves a
//! token back to the profile; `POST /auth/logout` invalidates it. Every
//! successful operation leaves an audit trail entry.
//!
//! The whole `/auth` surface sits behind a feature flag and is disabled by
//! default.

pub mod api;
pub mod auth;
pub mod cli;
