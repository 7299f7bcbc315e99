use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use abstractor::cli::{Cli, Commands};
use abstractor::core::llm::{CompletionClient, SamplingParams};
use abstractor::core::prompt::{PromptTemplate, TaskKind};
use abstractor::storage::ArtifactStore;
use abstractor::{batch, launcher, server, utils, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            inputs,
            output_dir,
            model_name,
            task,
            prompt_index,
            endpoint,
        } => {
            handle_run(
                &settings,
                inputs,
                output_dir,
                model_name,
                task,
                prompt_index,
                endpoint,
            )
            .await
        }
        Commands::Launch {
            model_path,
            context,
            ngl,
            port,
            server_bin,
        } => handle_launch(&settings, model_path, context, ngl, port, server_bin).await,
        Commands::Serve { port } => handle_serve(&settings, port).await,
        Commands::Health { endpoint } => handle_health(&settings, endpoint).await,
    }
}

async fn handle_run(
    settings: &Settings,
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    model_name: Option<String>,
    task: TaskKind,
    prompt_index: u32,
    endpoint: Option<String>,
) -> Result<()> {
    let endpoint = endpoint.unwrap_or_else(|| settings.llm.endpoint.clone());
    let model_name = model_name.unwrap_or_else(|| settings.llm.model.clone());

    let records = batch::load_reports(&inputs).await?;
    utils::print_info(&format!(
        "Processing {} reports from {} file(s)",
        records.len(),
        inputs.len()
    ));

    let store = ArtifactStore::new(output_dir).await?;
    let client = CompletionClient::new(&endpoint);
    let template = PromptTemplate::for_task(task);
    let params = batch::RunParams {
        model_name,
        prompt_index,
        sampling: SamplingParams::from(&settings.llm),
    };

    batch::run(&client, &store, &template, &params, &records).await
}

async fn handle_launch(
    settings: &Settings,
    model_path: PathBuf,
    context: u32,
    ngl: u32,
    port: u16,
    server_bin: Option<PathBuf>,
) -> Result<()> {
    let options = launcher::LaunchOptions {
        server_bin: server_bin.unwrap_or_else(|| settings.launcher.server_bin.clone()),
        model_path,
        context_size: context,
        gpu_layers: ngl,
        port,
    };

    let status = launcher::launch(&options).await?;
    std::process::exit(status.code().unwrap_or(1));
}

async fn handle_serve(settings: &Settings, port: Option<u16>) -> Result<()> {
    let api_key = Settings::api_key()?;
    let port = port.unwrap_or(settings.server.port);

    let state = server::AppState {
        client: Arc::new(CompletionClient::new(&settings.llm.endpoint)),
        settings: Arc::new(settings.clone()),
        api_key,
        started_at: Instant::now(),
    };

    server::serve(state, &settings.server.bind, port).await
}

async fn handle_health(settings: &Settings, endpoint: Option<String>) -> Result<()> {
    let endpoint = endpoint.unwrap_or_else(|| settings.llm.endpoint.clone());
    let client = CompletionClient::new(&endpoint);

    utils::print_info(&format!("Probing completion endpoint at {}", endpoint));
    if client.probe().await {
        utils::print_success("LLM server is online");
    } else {
        utils::print_error("LLM server is offline");
        std::process::exit(1);
    }

    Ok(())
}
