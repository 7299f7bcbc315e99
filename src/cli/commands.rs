use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::prompt::TaskKind;

#[derive(Parser)]
#[command(name = "abstractor")]
#[command(author, version, about = "Batch clinical-report abstraction against a llama.cpp completion server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the batch abstraction over CSV report files
    Run {
        /// Report CSV files (each must carry a `Report` column), concatenated in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory the per-row artifacts are written to
        #[arg(short, long, default_value = "./analysis_responses")]
        output_dir: PathBuf,

        /// Model label embedded in artifact file names (default: configured model)
        #[arg(short, long)]
        model_name: Option<String>,

        /// Instruction template to drive the model with
        #[arg(long, value_enum, default_value = "abstraction")]
        task: TaskKind,

        /// Prompt-variant tag embedded in artifact file names
        #[arg(long, default_value_t = 0)]
        prompt_index: u32,

        /// Completion server base URL (overrides config)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Launch a local llama.cpp server
    Launch {
        /// Path to the .gguf model file (e.g. ../models/mistral-7b.Q4_K_M.gguf)
        model_path: PathBuf,

        /// Context window size
        #[arg(short = 'c', long = "context", default_value_t = 2048)]
        context: u32,

        /// Number of layers to offload to the GPU (0 = CPU only)
        #[arg(long, default_value_t = 0)]
        ngl: u32,

        /// Port to launch the server on
        #[arg(long, default_value_t = 8080)]
        port: u16,

        /// Path to the llama-server executable (overrides config)
        #[arg(long)]
        server_bin: Option<PathBuf>,
    },

    /// Serve the HTTP abstraction API
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check connectivity to the completion endpoint
    Health {
        /// Completion server base URL (overrides config)
        #[arg(long)]
        endpoint: Option<String>,
    },
}
