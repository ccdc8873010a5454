use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::AsrBackend;
use crate::vtt::{self, Caption};

/// ASR collaborator invoked as an external command.
///
/// The command receives an optional `--language <hint>` followed by the
/// slice path, and must print a WebVTT caption track on stdout.
pub struct CommandAsr {
    program: String,
    args: Vec<String>,
}

impl CommandAsr {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

#[async_trait]
impl AsrBackend for CommandAsr {
    async fn transcribe(
        &self,
        slice: &Path,
        language_hint: Option<&str>,
    ) -> anyhow::Result<Vec<Caption>> {
        debug!(program = %self.program, slice = %slice.display(), "Running ASR command");

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(lang) = language_hint {
            cmd.arg("--language").arg(lang);
        }
        cmd.arg(slice);

        let output = cmd.output().await.map_err(|e| {
            anyhow::anyhow!("Failed to run ASR command '{}': {}", self.program, e)
        })?;

        if !output.status.success() {
            anyhow::bail!(
                "ASR command '{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(vtt::parse_track(&String::from_utf8_lossy(&output.stdout)))
    }

    fn name(&self) -> &str {
        &self.program
    }
}
