pub mod command;

use std::path::Path;

use async_trait::async_trait;

use crate::vtt::Caption;

pub use command::CommandAsr;

/// Trait for pluggable ASR collaborators.
///
/// Input is a single-speaker audio slice; output captions are timed
/// relative to the slice start (the Caption Aligner translates them onto
/// the absolute timeline).
#[async_trait]
pub trait AsrBackend: Send + Sync + 'static {
    /// Transcribes one audio slice.
    async fn transcribe(
        &self,
        slice: &Path,
        language_hint: Option<&str>,
    ) -> anyhow::Result<Vec<Caption>>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
