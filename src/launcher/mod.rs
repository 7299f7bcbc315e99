//! llama.cpp Server Launcher
//!
//! Validates the executable and model paths up front, then runs the server
//! as a child process. No supervision or restart; the child's exit status
//! becomes the launcher's.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

use crate::utils;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Could not find llama-server executable at: {}", .0.display())]
    ServerBinaryMissing(PathBuf),
    #[error("Model file not found: {}", .0.display())]
    ModelFileMissing(PathBuf),
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub server_bin: PathBuf,
    pub model_path: PathBuf,
    pub context_size: u32,
    pub gpu_layers: u32,
    pub port: u16,
}

impl LaunchOptions {
    /// Fail fast when the executable or the model file is missing. Nothing
    /// is spawned when this returns an error.
    pub fn validate(&self) -> Result<(), LaunchError> {
        if !self.server_bin.is_file() {
            return Err(LaunchError::ServerBinaryMissing(self.server_bin.clone()));
        }
        if !self.model_path.is_file() {
            return Err(LaunchError::ModelFileMissing(self.model_path.clone()));
        }
        Ok(())
    }

    /// Argument vector passed to the server. `-ngl` is only emitted when
    /// layers are actually offloaded.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            self.model_path.display().to_string(),
            "-c".to_string(),
            self.context_size.to_string(),
            "--port".to_string(),
            self.port.to_string(),
        ];

        if self.gpu_layers > 0 {
            args.push("-ngl".to_string());
            args.push(self.gpu_layers.to_string());
        }

        args
    }
}

/// Validate and start the server, waiting until it exits.
pub async fn launch(options: &LaunchOptions) -> Result<ExitStatus> {
    options.validate()?;

    utils::print_header("Launching llama.cpp server");
    utils::print_kv("Model", options.model_path.display());
    utils::print_kv("Context size", options.context_size);
    utils::print_kv("GPU layers (ngl)", options.gpu_layers);
    utils::print_kv("Port", options.port);

    let status = Command::new(&options.server_bin)
        .args(options.to_args())
        .status()
        .await
        .context("Failed to spawn llama-server")?;

    tracing::info!("[launcher] Server exited with status {}", status);
    Ok(status)
}
