//! Small helpers shared by the auth handlers.

use axum::http::HeaderMap;

/// Extract the client IP from common proxy headers.
///
/// Game servers usually sit behind a reverse proxy, so `x-forwarded-for`
/// (first hop) wins over `x-real-ip`. Absent headers yield `None`; the core
/// stores a null last-login IP in that case.
pub(super) fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
