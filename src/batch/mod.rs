//! Batch Completion Runner
//!
//! One record at a time, in input order: render the prompt, call the
//! completion endpoint, derive timing estimates, persist one artifact per
//! row. A failed call produces an error artifact for that row only; the
//! loop keeps going and the run itself only fails on local I/O errors.

pub mod records;

pub use records::{load_reports, Record};

use anyhow::Result;
use serde_json::{json, Value};

use crate::core::llm::{annotate_with_timings, CompletionBackend, CompletionRequest, SamplingParams};
use crate::core::prompt::PromptTemplate;
use crate::core::timings::Timings;
use crate::storage::ArtifactStore;
use crate::utils;

/// Per-run configuration for the batch loop.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Model label embedded in artifact file names.
    pub model_name: String,
    /// Prompt-variant tag embedded in artifact file names.
    pub prompt_index: u32,
    pub sampling: SamplingParams,
}

/// Build the completion request for one record.
pub fn build_request(
    template: &PromptTemplate,
    sampling: &SamplingParams,
    record: &Record,
) -> CompletionRequest {
    CompletionRequest {
        prompt: template.render(&record.report),
        temperature: sampling.temperature,
        top_p: sampling.top_p,
        top_k: sampling.top_k,
        max_tokens: sampling.max_tokens,
        stop: template.stop_sequences(),
    }
}

/// Artifact body for a failed record: the error message plus all-null timings.
pub fn error_artifact(message: &str) -> Value {
    json!({
        "error": message,
        "timings": Timings::null(),
    })
}

/// Process one record into its artifact body. Failures are converted into an
/// error artifact here rather than propagated, so one bad call cannot abort
/// the batch.
pub async fn process_record(
    backend: &dyn CompletionBackend,
    template: &PromptTemplate,
    sampling: &SamplingParams,
    record: &Record,
) -> Value {
    let request = build_request(template, sampling, record);

    match backend
        .complete(&request)
        .await
        .and_then(annotate_with_timings)
    {
        Ok(artifact) => artifact,
        Err(e) => {
            tracing::warn!("[batch] Row {} failed: {:#}", record.index, e);
            error_artifact(&format!("{:#}", e))
        }
    }
}

/// Run the batch: every record, in input order, one artifact per record.
pub async fn run(
    backend: &dyn CompletionBackend,
    store: &ArtifactStore,
    template: &PromptTemplate,
    params: &RunParams,
    records: &[Record],
) -> Result<()> {
    for record in records {
        let artifact = process_record(backend, template, &params.sampling, record).await;
        let filename = store
            .write(record.index, &params.model_name, params.prompt_index, &artifact)
            .await?;
        utils::print_success(&format!("Saved: {}", filename));
    }

    Ok(())
}
