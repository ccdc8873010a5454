pub mod align;
pub mod asr;
pub mod audio;
pub mod cache;
pub mod diarization;
pub mod edit;
pub mod error;
pub mod fsutil;
pub mod html;
pub mod job;
pub mod pipeline;
pub mod timecode;
pub mod transcript;
pub mod vtt;

pub use align::{AlignedCaption, CaptionAligner};
pub use asr::AsrBackend;
pub use cache::CacheState;
pub use diarization::{DiarizationBackend, RawTurn, Segment, group_turns};
pub use edit::{EditReport, EditRequest, apply_edits};
pub use error::PipelineError;
pub use job::{Job, JobRegistry, JobStatus, ProgressSink};
pub use pipeline::{PipelineConfig, PipelineOutcome, TranscriptionPipeline};
pub use transcript::{SpeakerStyle, SpeakerStyles, TranscriptSection};
pub use vtt::{Caption, CaptionTrack};
