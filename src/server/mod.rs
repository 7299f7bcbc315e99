//! HTTP Proxy API
//!
//! Thin authenticated routes in front of the completion server. Each route
//! wraps the caller's text in a task prompt and returns the upstream
//! response with derived timing estimates attached.

mod auth;
mod error;
mod routes;

pub use error::ApiError;
pub use routes::{GenerateRequest, HealthStatus};

use anyhow::{Context, Result};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::core::llm::CompletionClient;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<CompletionClient>,
    pub settings: Arc<Settings>,
    pub api_key: String,
    pub started_at: Instant,
}

pub fn build_router(state: AppState) -> Router {
    let generate_routes = Router::new()
        .route("/abstraction", post(routes::abstraction))
        .route("/summarize", post(routes::summarize))
        .route("/translate", post(routes::translate))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .merge(generate_routes)
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    tracing::info!("[server] Listening on {}", addr);
    axum::serve(listener, build_router(state))
        .await
        .context("Server error")?;

    Ok(())
}
