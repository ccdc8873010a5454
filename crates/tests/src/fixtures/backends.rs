use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use voxalign_transcription::asr::AsrBackend;
use voxalign_transcription::diarization::{DiarizationBackend, RawTurn};
use voxalign_transcription::vtt::Caption;

/// Diarizer that returns a fixed turn list regardless of the audio.
pub struct ScriptedDiarizer {
    pub turns: Vec<RawTurn>,
}

impl ScriptedDiarizer {
    pub fn new(turns: Vec<(&str, u64, u64)>) -> Self {
        Self {
            turns: turns
                .into_iter()
                .map(|(speaker, start_ms, end_ms)| RawTurn {
                    speaker: speaker.to_string(),
                    start_ms,
                    end_ms,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl DiarizationBackend for ScriptedDiarizer {
    async fn diarize(&self, _audio: &Path) -> anyhow::Result<Vec<RawTurn>> {
        Ok(self.turns.clone())
    }

    fn name(&self) -> &str {
        "scripted-diarizer"
    }
}

/// ASR that answers from a per-segment script, keyed by the slice's
/// numeric file stem.
pub struct ScriptedAsr {
    pub per_segment: HashMap<usize, Vec<Caption>>,
}

impl ScriptedAsr {
    pub fn new(per_segment: Vec<(usize, Vec<(u64, u64, &str)>)>) -> Self {
        Self {
            per_segment: per_segment
                .into_iter()
                .map(|(index, captions)| {
                    (
                        index,
                        captions
                            .into_iter()
                            .map(|(start_ms, end_ms, text)| Caption {
                                start_ms,
                                end_ms,
                                text: text.to_string(),
                            })
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl AsrBackend for ScriptedAsr {
    async fn transcribe(
        &self,
        slice: &Path,
        _language_hint: Option<&str>,
    ) -> anyhow::Result<Vec<Caption>> {
        let index: usize = slice
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| anyhow::anyhow!("Unexpected slice path: {}", slice.display()))?;
        Ok(self.per_segment.get(&index).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted-asr"
    }
}

/// Diarizer that always fails, with a recognizable raw error.
pub struct FailingDiarizer;

#[async_trait]
impl DiarizationBackend for FailingDiarizer {
    async fn diarize(&self, _audio: &Path) -> anyhow::Result<Vec<RawTurn>> {
        anyhow::bail!("pyannote model not found")
    }

    fn name(&self) -> &str {
        "failing-diarizer"
    }
}

/// ASR that always fails.
pub struct FailingAsr;

#[async_trait]
impl AsrBackend for FailingAsr {
    async fn transcribe(
        &self,
        _slice: &Path,
        _language_hint: Option<&str>,
    ) -> anyhow::Result<Vec<Caption>> {
        anyhow::bail!("whisper ran out of memory")
    }

    fn name(&self) -> &str {
        "failing-asr"
    }
}

/// Diarizer that must never be reached; a call fails the job loudly, so
/// cache-reuse tests can prove the collaborator was skipped.
pub struct RefusingDiarizer;

#[async_trait]
impl DiarizationBackend for RefusingDiarizer {
    async fn diarize(&self, _audio: &Path) -> anyhow::Result<Vec<RawTurn>> {
        anyhow::bail!("diarizer called despite cached artifact")
    }

    fn name(&self) -> &str {
        "refusing-diarizer"
    }
}

/// ASR that must never be reached.
pub struct RefusingAsr;

#[async_trait]
impl AsrBackend for RefusingAsr {
    async fn transcribe(
        &self,
        _slice: &Path,
        _language_hint: Option<&str>,
    ) -> anyhow::Result<Vec<Caption>> {
        anyhow::bail!("ASR called despite cached caption track")
    }

    fn name(&self) -> &str {
        "refusing-asr"
    }
}
