use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use super::error::ApiError;
use super::AppState;
use crate::core::llm::{annotate_with_timings, CompletionBackend, CompletionRequest};
use crate::core::prompt::{PromptTemplate, TaskKind};

/// Generation request body. Sampling fields fall back to the configured
/// defaults when absent.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub max_tokens: Option<u32>,
}

pub async fn abstraction(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    generate(&state, TaskKind::Abstraction, payload).await
}

pub async fn summarize(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    generate(&state, TaskKind::Summarization, payload).await
}

pub async fn translate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    generate(&state, TaskKind::Translation, payload).await
}

/// Common handler body for the three generation routes.
async fn generate(
    state: &AppState,
    task: TaskKind,
    payload: GenerateRequest,
) -> Result<Json<Value>, ApiError> {
    let text = payload
        .text
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingText)?;

    let defaults = &state.settings.llm;
    let template = PromptTemplate::for_task(task);
    let request = CompletionRequest {
        prompt: template.render(text),
        temperature: payload.temperature.unwrap_or(defaults.temperature),
        top_p: payload.top_p.unwrap_or(defaults.top_p),
        top_k: payload.top_k.unwrap_or(defaults.top_k),
        max_tokens: payload.max_tokens.unwrap_or(defaults.max_tokens),
        stop: template.stop_sequences(),
    };

    let completion = state
        .client
        .complete(&request)
        .await
        .map_err(ApiError::Upstream)?;
    let annotated = annotate_with_timings(completion).map_err(ApiError::Upstream)?;

    Ok(Json(annotated))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub api: &'static str,
    pub llm: &'static str,
    pub uptime: f64,
    pub timestamp: u64,
}

/// Unauthenticated health check: probes the completion endpoint with a
/// zero-generation request and reports online/offline.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let llm = if state.client.probe().await {
        "online"
    } else {
        "offline"
    };

    Json(HealthStatus {
        api: "ok",
        llm,
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    })
}
