pub mod artifact;
pub mod command;
pub mod grouper;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use command::CommandDiarizer;
pub use grouper::{Segment, group_turns};

/// A single diarization turn: a claim that one speaker was talking during
/// `[start_ms, end_ms)`, measured against the spaced audio buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTurn {
    pub speaker: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Trait for pluggable speaker-diarization collaborators.
#[async_trait]
pub trait DiarizationBackend: Send + Sync + 'static {
    /// Diarizes a full recording. Turns are returned in detection order,
    /// which is not guaranteed to be time order.
    async fn diarize(&self, audio: &Path) -> anyhow::Result<Vec<RawTurn>>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
