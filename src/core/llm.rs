use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::config::LlmConfig;
use crate::core::timings::Timings;

/// JSON body sent to the completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

/// Sampling parameters shared by every request in a run.
#[derive(Debug, Clone)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl From<&LlmConfig> for SamplingParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_tokens: config.max_tokens,
        }
    }
}

/// Decoded response body plus the measured wall-clock duration of the call,
/// including the body download.
#[derive(Debug, Clone)]
pub struct TimedCompletion {
    pub body: Value,
    pub elapsed: Duration,
}

/// Seam for injecting a fake completion backend in tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<TimedCompletion>;
}

pub struct CompletionClient {
    client: Client,
    url: String,
}

impl CompletionClient {
    /// `endpoint` is the server base URL; the OpenAI-compatible completions
    /// path is appended here.
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/v1/completions", endpoint.trim_end_matches('/')),
        }
    }

    /// Minimal zero-generation request with a short timeout, used by health
    /// checks to decide online/offline.
    pub async fn probe(&self) -> bool {
        let payload = serde_json::json!({ "prompt": " ", "max_tokens": 0 });

        match self
            .client
            .post(&self.url)
            .timeout(Duration::from_secs(1))
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("[CompletionClient] probe failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<TimedCompletion> {
        let started = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .context("completion request failed")?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .context("failed to read completion response body")?;
        let elapsed = started.elapsed();

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            anyhow::bail!("completion endpoint returned {}: {}", status, body);
        }

        let body: Value =
            serde_json::from_slice(&bytes).context("failed to decode completion response")?;

        Ok(TimedCompletion { body, elapsed })
    }
}

/// Token counts from the response `usage` object; absent fields count as zero.
pub fn usage_counts(body: &Value) -> (u64, u64) {
    let usage = body.get("usage");
    let prompt_n = usage
        .and_then(|u| u.get("prompt_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let predicted_n = usage
        .and_then(|u| u.get("completion_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    (prompt_n, predicted_n)
}

/// Attach derived timing estimates to a completion response body under a
/// `timings` key. Fails when the body is not a JSON object.
pub fn annotate_with_timings(completion: TimedCompletion) -> Result<Value> {
    let TimedCompletion { body, elapsed } = completion;
    let (prompt_n, predicted_n) = usage_counts(&body);

    match body {
        Value::Object(mut map) => {
            let timings = Timings::derive(elapsed, prompt_n, predicted_n);
            map.insert("timings".to_string(), serde_json::json!(timings));
            Ok(Value::Object(map))
        }
        _ => anyhow::bail!("completion response was not a JSON object"),
    }
}
