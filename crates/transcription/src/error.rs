use thiserror::Error;

/// Errors surfaced by the transcription pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source media missing or unreadable. Raised before any artifact is
    /// touched.
    #[error("input error: {0}")]
    Input(String),

    /// An external collaborator (decoder, diarizer, ASR) failed or returned
    /// malformed output. `message` carries the raw stderr of the invocation.
    #[error("{stage} collaborator failed: {message}")]
    Collaborator {
        stage: &'static str,
        message: String,
    },

    /// Cached artifacts exist in a combination that cannot be regenerated
    /// from. Callers fall back to a full re-run instead of guessing.
    #[error("cache inconsistency: {0}")]
    CacheInconsistency(String),

    #[error("audio error: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
