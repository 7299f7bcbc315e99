use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub launcher: LauncherConfig,
    pub logging: LoggingConfig,
}

/// Completion endpoint and the sampling parameters sent with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    pub server_bin: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Config::builder()
            .set_default("llm.endpoint", "http://127.0.0.1:8080")?
            .set_default("llm.model", "Qwen2.5_instruct_14B")?
            .set_default("llm.temperature", 0.3)?
            .set_default("llm.top_p", 1.0)?
            .set_default("llm.top_k", 1)?
            .set_default("llm.max_tokens", 2048)?
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("launcher.server_bin", "./llama.cpp/build/bin/llama-server")?
            .set_default("logging.level", "info")?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn api_key() -> Result<String> {
        env::var("API_KEY").map_err(|_| anyhow::anyhow!("API_KEY environment variable not set"))
    }
}
