use std::sync::Arc;

use voxalign_config::Settings;
use voxalign_transcription::{JobRegistry, TranscriptionPipeline};

/// Shared services injected into route handlers.
///
/// The job registry is owned here and handed to workers; the pipeline
/// itself carries no ambient state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub jobs: Arc<JobRegistry>,
    pub pipeline: Arc<TranscriptionPipeline>,
}
