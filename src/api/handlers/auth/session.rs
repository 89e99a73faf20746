//! Token endpoints: verify a held token, or invalidate it on logout.

use axum::{
    extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse,
    response::Response, Json,
};
use std::sync::Arc;

use super::state::AuthState;
use super::types::{
    error_response, feature_disabled, validation_error, AuthenticatedUser, StatusResponse,
    TokenRequest,
};
use super::utils::extract_client_ip;

#[utoipa::path(
    post,
    path = "/auth/verify",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token is valid; profile returned", body = AuthenticatedUser),
        (status = 400, description = "Auth API is not enabled", body = StatusResponse),
        (status = 401, description = "Invalid token", body = StatusResponse),
        (status = 403, description = "User banned", body = StatusResponse),
    ),
    tag = "auth"
)]
pub async fn verify(
    Extension(state): Extension<Arc<AuthState>>,
    headers: HeaderMap,
    payload: Option<Json<TokenRequest>>,
) -> Response {
    if !state.config().api_enabled() {
        return feature_disabled();
    }

    let Some(Json(request)) = payload else {
        return validation_error("Missing access token");
    };
    if request.access_token.is_empty() {
        return validation_error("Missing access token");
    }

    let ip = extract_client_ip(&headers);
    match state
        .service()
        .verify(&request.access_token, ip.as_deref())
        .await
    {
        Ok(user) => (StatusCode::OK, Json(AuthenticatedUser::from(user))).into_response(),
        Err(err) => error_response(&err),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token invalidated (or was never held)", body = StatusResponse),
        (status = 400, description = "Auth API is not enabled", body = StatusResponse),
    ),
    tag = "auth"
)]
pub async fn logout(
    Extension(state): Extension<Arc<AuthState>>,
    payload: Option<Json<TokenRequest>>,
) -> Response {
    if !state.config().api_enabled() {
        return feature_disabled();
    }

    let Some(Json(request)) = payload else {
        return validation_error("Missing access token");
    };
    if request.access_token.is_empty() {
        return validation_error("Missing access token");
    }

    match state.service().logout(&request.access_token).await {
        Ok(()) => (StatusCode::OK, Json(StatusResponse::success())).into_response(),
        Err(err) => error_response(&err),
    }
}
