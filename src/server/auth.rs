use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use super::AppState;

/// Expects `Authorization: ApiKey <key>`. Missing header or a different
/// scheme is a 401; a wrong key is a 403.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    check_header(header, &state.api_key)?;
    Ok(next.run(request).await)
}

fn check_header(header: Option<&str>, expected_key: &str) -> Result<(), ApiError> {
    let header = header.ok_or(ApiError::MissingAuth)?;

    let mut parts = header.split_whitespace();
    let (scheme, key) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(key), None) => (scheme, key),
        _ => return Err(ApiError::InvalidAuthScheme),
    };

    if scheme != "ApiKey" {
        return Err(ApiError::InvalidAuthScheme);
    }
    if key != expected_key {
        return Err(ApiError::InvalidApiKey);
    }

    Ok(())
}
