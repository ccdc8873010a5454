use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::{DiarizationBackend, RawTurn, artifact};

/// Diarization collaborator invoked as an external command.
///
/// The command receives the audio file path as its final argument and must
/// print turn records (`start --> end speakerLabel`) on stdout.
pub struct CommandDiarizer {
    program: String,
    args: Vec<String>,
}

impl CommandDiarizer {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

#[async_trait]
impl DiarizationBackend for CommandDiarizer {
    async fn diarize(&self, audio: &Path) -> anyhow::Result<Vec<RawTurn>> {
        debug!(program = %self.program, audio = %audio.display(), "Running diarization command");

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(audio)
            .output()
            .await
            .map_err(|e| {
                anyhow::anyhow!("Failed to run diarization command '{}': {}", self.program, e)
            })?;

        if !output.status.success() {
            anyhow::bail!(
                "Diarization command '{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let turns = artifact::parse_artifact(&stdout);
        if turns.is_empty() {
            anyhow::bail!(
                "Diarization command '{}' produced no parseable turns",
                self.program
            );
        }
        Ok(turns)
    }

    fn name(&self) -> &str {
        &self.program
    }
}
