use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing text input")]
    MissingText,
    #[error("Missing Authorization header")]
    MissingAuth,
    #[error("Invalid authorization scheme")]
    InvalidAuthScheme,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("LLM call failed")]
    Upstream(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Upstream(ref e) = self {
            tracing::error!("LLM error: {:#}", e);
        }

        let status = match &self {
            ApiError::MissingText => StatusCode::BAD_REQUEST,
            ApiError::MissingAuth | ApiError::InvalidAuthScheme => StatusCode::UNAUTHORIZED,
            ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}
