//! End-to-end batch runs against a mock completion server.
//!
//! These tests drive the public API the same way the `run` subcommand does:
//! load CSV reports, run the batch, inspect the artifacts on disk.

use abstractor::batch::{self, RunParams};
use abstractor::core::llm::{CompletionClient, SamplingParams};
use abstractor::core::prompt::{PromptTemplate, TaskKind};
use abstractor::storage::ArtifactStore;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sampling() -> SamplingParams {
    SamplingParams {
        temperature: 0.3,
        top_p: 1.0,
        top_k: 1,
        max_tokens: 2048,
    }
}

fn write_reports(dir: &TempDir) -> Vec<PathBuf> {
    let text = dir.path().join("text_reports.csv");
    std::fs::write(
        &text,
        "Report\nPati\u{eb}nt was rustig vandaag\nPati\u{eb}nt was boos tijdens het eten\n",
    )
    .unwrap();

    let voice = dir.path().join("voice_reports.csv");
    std::fs::write(&voice, "Report\nPati\u{eb}nt sliep goed\n").unwrap();

    vec![text, voice]
}

fn read_artifact(dir: &TempDir, index: usize, model: &str, prompt_index: u32) -> Value {
    let path = dir
        .path()
        .join(format!("row_{}-{}-prompt_{}.json", index, model, prompt_index));
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_batch_run_end_to_end() {
    let mock_server = MockServer::start().await;

    // The second record's prompt trips a server error; everything else succeeds
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .and(body_string_contains("boos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "abstractie",
            "usage": { "prompt_tokens": 12, "completion_tokens": 34 }
        })))
        .mount(&mock_server)
        .await;

    let input_dir = TempDir::new().unwrap();
    let inputs = write_reports(&input_dir);
    let records = batch::load_reports(&inputs).await.unwrap();
    assert_eq!(records.len(), 3);

    let out = TempDir::new().unwrap();
    let store = ArtifactStore::new(out.path().to_path_buf()).await.unwrap();
    let client = CompletionClient::new(&mock_server.uri());
    let template = PromptTemplate::for_task(TaskKind::Abstraction);
    let params = RunParams {
        model_name: "Qwen2.5_instruct_14B".to_string(),
        prompt_index: 6,
        sampling: sampling(),
    };

    batch::run(&client, &store, &template, &params, &records)
        .await
        .unwrap();

    // Exactly one artifact per record, named by index/model/prompt-variant
    for index in 0..3 {
        let path = out.path().join(format!(
            "row_{}-Qwen2.5_instruct_14B-prompt_6.json",
            index
        ));
        assert!(path.exists(), "missing artifact for row {}", index);
    }

    let first = read_artifact(&out, 0, "Qwen2.5_instruct_14B", 6);
    assert_eq!(first["content"], "abstractie");
    assert_eq!(first["timings"]["prompt_n"], 12);
    assert_eq!(first["timings"]["predicted_n"], 34);
    assert!(first["timings"]["prompt_ms"].is_number());
    assert!(first["timings"]["predicted_per_second"].is_number());

    // The failure stayed isolated to its own artifact
    let failed = read_artifact(&out, 1, "Qwen2.5_instruct_14B", 6);
    assert!(failed["error"].as_str().unwrap().contains("500"));
    let timings = failed["timings"].as_object().unwrap();
    assert!(timings.values().all(Value::is_null));

    let third = read_artifact(&out, 2, "Qwen2.5_instruct_14B", 6);
    assert_eq!(third["content"], "abstractie");
}

#[tokio::test]
async fn test_rerun_overwrites_artifacts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "eerste versie",
            "usage": { "prompt_tokens": 1, "completion_tokens": 1 }
        })))
        .mount(&mock_server)
        .await;

    let input_dir = TempDir::new().unwrap();
    let csv = input_dir.path().join("reports.csv");
    std::fs::write(&csv, "Report\neen rapport\n").unwrap();
    let records = batch::load_reports(&[csv]).await.unwrap();

    let out = TempDir::new().unwrap();
    let store = ArtifactStore::new(out.path().to_path_buf()).await.unwrap();
    let client = CompletionClient::new(&mock_server.uri());
    let template = PromptTemplate::for_task(TaskKind::Abstraction);
    let params = RunParams {
        model_name: "test".to_string(),
        prompt_index: 0,
        sampling: sampling(),
    };

    batch::run(&client, &store, &template, &params, &records)
        .await
        .unwrap();

    mock_server.reset().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "tweede versie",
            "usage": { "prompt_tokens": 1, "completion_tokens": 1 }
        })))
        .mount(&mock_server)
        .await;

    batch::run(&client, &store, &template, &params, &records)
        .await
        .unwrap();

    let artifact = read_artifact(&out, 0, "test", 0);
    assert_eq!(artifact["content"], "tweede versie");

    // Still exactly one artifact
    let count = std::fs::read_dir(out.path()).unwrap().count();
    assert_eq!(count, 1);
}
