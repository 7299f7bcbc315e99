pub mod settings;

pub use settings::{LauncherConfig, LlmConfig, LoggingConfig, ServerConfig, Settings};
