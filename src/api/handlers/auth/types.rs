//! Wire types and error mapping for the auth endpoints.
//!
//! The envelope fields (`status`, `reason`, `message`, `ban_reason`) and the
//! HTTP status codes are frozen for compatibility with deployed game-server
//! clients.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthError, User};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthenticateRequest {
    /// Login identifier: an email address or, when it contains no `@`, an
    /// account name. The field keeps its historical wire name.
    pub email: String,
    pub password: String,
    /// Second-factor code (TOTP or recovery), required once enrolled.
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenRequest {
    pub access_token: String,
}

/// Public profile returned on successful authenticate/verify.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub game_id: Option<Uuid>,
    pub access_token: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            game_id: user.game_id,
            access_token: user.access_token,
            last_login_at: user.last_login_at,
        }
    }
}

/// Response envelope for failures and plain acknowledgments.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    /// `success`, `error`, or `pending`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_reason: Option<String>,
}

impl StatusResponse {
    pub(super) fn success() -> Self {
        Self {
            status: "success".to_string(),
            reason: None,
            message: None,
            ban_reason: None,
        }
    }

    fn error(reason: &str, message: &str) -> Self {
        Self {
            status: "error".to_string(),
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
            ban_reason: None,
        }
    }
}

/// Fixed response when the auth API feature flag is off.
pub(super) fn feature_disabled() -> Response {
    let body = StatusResponse {
        status: "error".to_string(),
        reason: None,
        message: Some("Auth API is not enabled".to_string()),
        ban_reason: None,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

pub(super) fn validation_error(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(StatusResponse::error("validation", message)),
    )
        .into_response()
}

/// Map a core failure onto the frozen wire envelope.
pub(super) fn error_response(err: &AuthError) -> Response {
    match err {
        AuthError::InvalidCredentials => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(StatusResponse::error(
                "invalid_credentials",
                "Invalid credentials",
            )),
        )
            .into_response(),
        AuthError::Banned { reason } => {
            let body = StatusResponse {
                status: "error".to_string(),
                reason: Some("user_banned".to_string()),
                message: Some("User banned".to_string()),
                ban_reason: Some(reason.clone()),
            };
            (StatusCode::FORBIDDEN, Json(body)).into_response()
        }
        AuthError::MissingTwoFactor => {
            // "pending": credentials were fine, the client should prompt for
            // a code and retry.
            let body = StatusResponse {
                status: "pending".to_string(),
                reason: Some("2fa".to_string()),
                message: Some("Missing 2FA code".to_string()),
                ban_reason: None,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
        AuthError::InvalidTwoFactor => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(StatusResponse::error("invalid_2fa", "Invalid 2FA code")),
        )
            .into_response(),
        AuthError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            Json(StatusResponse::error("invalid_token", "Invalid token")),
        )
            .into_response(),
        AuthError::Store(err) => {
            error!("Auth store failure: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::error(
                    "internal_error",
                    "Internal server error",
                )),
            )
                .into_response()
        }
    }
}
