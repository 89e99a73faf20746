//! Login endpoint: credentials + optional second factor -> access token.

use axum::{extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse, response::Response, Json};
use std::sync::Arc;

use super::state::AuthState;
use super::types::{
    error_response, feature_disabled, validation_error, AuthenticateRequest, AuthenticatedUser,
    StatusResponse,
};
use super::utils::extract_client_ip;

#[utoipa::path(
    post,
    path = "/auth/authenticate",
    request_body = AuthenticateRequest,
    responses(
        (status = 200, description = "Authenticated; profile with a fresh access token", body = AuthenticatedUser),
        (status = 400, description = "Auth API is not enabled", body = StatusResponse),
        (status = 403, description = "User banned", body = StatusResponse),
        (status = 422, description = "Invalid credentials, missing 2FA code, or invalid 2FA code", body = StatusResponse),
    ),
    tag = "auth"
)]
pub async fn authenticate(
    Extension(state): Extension<Arc<AuthState>>,
    headers: HeaderMap,
    payload: Option<Json<AuthenticateRequest>>,
) -> Response {
    // Feature gate first: nothing below runs when the API is off.
    if !state.config().api_enabled() {
        return feature_disabled();
    }

    let Some(Json(request)) = payload else {
        return validation_error("Missing credentials");
    };
    let identifier = request.email.trim();
    if identifier.is_empty() || request.password.is_empty() {
        return validation_error("Missing credentials");
    }

    let ip = extract_client_ip(&headers);
    let result = state
        .service()
        .authenticate(
            identifier,
            &request.password,
            request.code.as_deref(),
            ip.as_deref(),
        )
        .await;

    match result {
        Ok(user) => (StatusCode::OK, Json(AuthenticatedUser::from(user))).into_response(),
        Err(err) => error_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::authenticate;
    use crate::api::handlers::auth::state::{AuthConfig, AuthState};
    use crate::api::handlers::auth::types::AuthenticateRequest;
    use crate::auth::memory::{user_fixture, MemoryStore};
    use crate::auth::AuthService;
    use anyhow::{Context, Result};
    use axum::extract::Extension;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::Response;
    use axum::Json;
    use serde_json::Value;
    use std::sync::Arc;

    async fn body_json(response: Response) -> Result<Value> {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read body")?;
        serde_json::from_slice(&bytes).context("parse body")
    }

    fn state(enabled: bool, store: MemoryStore) -> Extension<Arc<AuthState>> {
        let service = AuthService::new(Arc::new(store));
        Extension(Arc::new(AuthState::new(
            AuthConfig::new().with_api_enabled(enabled),
            service,
        )))
    }

    fn request(email: &str, password: &str, code: Option<&str>) -> Option<Json<AuthenticateRequest>> {
        Some(Json(AuthenticateRequest {
            email: email.to_string(),
            password: password.to_string(),
            code: code.map(ToString::to_string),
        }))
    }

    #[tokio::test]
    async fn disabled_api_short_circuits() -> Result<()> {
        let store = MemoryStore::new();
        store.add_user(user_fixture("alice@example.com", "alice", "secret123")?);

        let response = authenticate(
            state(false, store),
            HeaderMap::new(),
            request("alice@example.com", "secret123", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await?;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Auth API is not enabled");
        Ok(())
    }

    #[tokio::test]
    async fn missing_payload_is_a_validation_error() -> Result<()> {
        let response = authenticate(state(true, MemoryStore::new()), HeaderMap::new(), None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await?;
        assert_eq!(body["reason"], "validation");
        Ok(())
    }

    #[tokio::test]
    async fn successful_login_returns_profile_and_token() -> Result<()> {
        let store = MemoryStore::new();
        store.add_user(user_fixture("alice@example.com", "alice", "secret123")?);

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "10.1.2.3".parse()?);
        let response = authenticate(
            state(true, store),
            headers,
            request("alice@example.com", "secret123", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await?;
        assert_eq!(body["email"], "alice@example.com");
        assert_eq!(
            body["access_token"].as_str().context("token")?.len(),
            crate::auth::TOKEN_LENGTH
        );
        assert!(body["game_id"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_maps_to_invalid_credentials() -> Result<()> {
        let store = MemoryStore::new();
        store.add_user(user_fixture("alice@example.com", "alice", "secret123")?);

        let response = authenticate(
            state(true, store),
            HeaderMap::new(),
            request("alice@example.com", "nope", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await?;
        assert_eq!(body["reason"], "invalid_credentials");
        Ok(())
    }

    #[tokio::test]
    async fn missing_code_is_pending_two_factor() -> Result<()> {
        let store = MemoryStore::new();
        let mut user = user_fixture("alice@example.com", "alice", "secret123")?;
        user.two_factor_secret = Some("JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP".to_string());
        store.add_user(user);

        let response = authenticate(
            state(true, store),
            HeaderMap::new(),
            request("alice@example.com", "secret123", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await?;
        assert_eq!(body["status"], "pending");
        assert_eq!(body["reason"], "2fa");
        Ok(())
    }

    #[tokio::test]
    async fn banned_user_gets_ban_reason() -> Result<()> {
        let store = MemoryStore::new();
        let mut user = user_fixture("alice@example.com", "alice", "secret123")?;
        user.ban = Some(crate::auth::Ban {
            reason: "cheating".to_string(),
        });
        store.add_user(user);

        let response = authenticate(
            state(true, store),
            HeaderMap::new(),
            request("alice@example.com", "secret123", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await?;
        assert_eq!(body["reason"], "user_banned");
        assert_eq!(body["ban_reason"], "cheating");
        Ok(())
    }
}
