use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Per-row artifact writer. Files are stored as
/// `{output_dir}/row_{index}-{model}-prompt_{prompt_index}.json`.
pub struct ArtifactStore {
    output_dir: PathBuf,
}

impl ArtifactStore {
    pub async fn new(output_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&output_dir)
            .await
            .context("Failed to create output directory")?;

        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Deterministic artifact file name for a row.
    pub fn file_name(index: usize, model_name: &str, prompt_index: u32) -> String {
        format!("row_{}-{}-prompt_{}.json", index, model_name, prompt_index)
    }

    fn artifact_path(&self, index: usize, model_name: &str, prompt_index: u32) -> PathBuf {
        self.output_dir
            .join(Self::file_name(index, model_name, prompt_index))
    }

    /// Serialize the artifact as indented JSON, overwriting any existing
    /// file. Returns the file name that was written.
    pub async fn write(
        &self,
        index: usize,
        model_name: &str,
        prompt_index: u32,
        artifact: &Value,
    ) -> Result<String> {
        let path = self.artifact_path(index, model_name, prompt_index);
        let json =
            serde_json::to_string_pretty(artifact).context("Failed to serialize artifact")?;

        fs::write(&path, json)
            .await
            .context(format!("Failed to write artifact file: {:?}", path))?;

        tracing::debug!("[ArtifactStore] Wrote artifact for row {} to {:?}", index, path);
        Ok(Self::file_name(index, model_name, prompt_index))
    }
}
