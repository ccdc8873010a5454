use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::align::CaptionAligner;
use crate::asr::AsrBackend;
use crate::audio;
use crate::cache::{self, CacheState};
use crate::diarization::{DiarizationBackend, Segment, artifact, group_turns};
use crate::error::PipelineError;
use crate::html;
use crate::job::ProgressSink;
use crate::transcript::{self, SpeakerStyles, TranscriptSection};
use crate::vtt;

/// Media extensions accepted as pipeline input.
pub const MEDIA_EXTENSIONS: &[&str] = &["mp4", "m4a", "wav", "mp3", "mkv", "mov"];

/// Configuration for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory holding uploads, per-file working directories and
    /// rendered transcripts.
    pub transcription_dir: PathBuf,
    /// Leading silence inserted before diarization, in milliseconds.
    pub spacer_ms: u64,
    /// Language hint forwarded to the ASR collaborator.
    pub language: Option<String>,
    /// Audio container decoder program.
    pub ffmpeg: String,
    /// Optional HTML-to-document converter program.
    pub docx_converter: Option<String>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub basename: String,
    pub html_path: PathBuf,
    pub segment_count: usize,
    pub reused_cache: bool,
}

/// The diarize → slice → transcribe → align → render pipeline.
///
/// A pure function of (input file, cache state): all run state lives in
/// the working directory, collaborators are injected, and progress goes
/// through the supplied sink.
pub struct TranscriptionPipeline {
    diarizer: Arc<dyn DiarizationBackend>,
    asr: Arc<dyn AsrBackend>,
    config: PipelineConfig,
}

impl TranscriptionPipeline {
    pub fn new(
        diarizer: Arc<dyn DiarizationBackend>,
        asr: Arc<dyn AsrBackend>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            diarizer,
            asr,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline for a media file under the transcription dir.
    ///
    /// A reusable working directory (diarization artifact + at least one
    /// caption track) short-circuits to regeneration; otherwise the full
    /// pipeline runs and, on success, deletes its intermediate audio while
    /// keeping the durable cache artifacts.
    pub async fn run(
        &self,
        input_file_name: &str,
        speaker_names: Option<&[String]>,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineOutcome, PipelineError> {
        let input_path = self.config.transcription_dir.join(input_file_name);
        if !input_path.is_file() {
            return Err(PipelineError::Input(format!(
                "Source file not found: {}",
                input_path.display()
            )));
        }

        let basename = file_stem(input_file_name);
        let workdir = self.config.transcription_dir.join(&basename);
        std::fs::create_dir_all(&workdir)?;

        sink.update(5, "Preparing working directory");

        let cache_state = CacheState::inspect(&workdir, &basename);
        if cache_state.is_reusable {
            info!(
                basename = %basename,
                tracks = cache_state.caption_track_count,
                "Reusing cached diarization and caption tracks"
            );
            sink.update(60, "Regenerating transcript from cached artifacts");
            match self.regenerate_from_cache(&basename, input_file_name, speaker_names) {
                Ok(outcome) => return Ok(outcome),
                Err(PipelineError::CacheInconsistency(reason)) => {
                    warn!(%reason, "Cached artifacts unusable, running the full pipeline");
                }
                Err(e) => return Err(e),
            }
        }

        // Full pipeline from here on.
        let cache_wav = workdir.join(format!("{basename}.cache.wav"));
        if !cache_wav.is_file() {
            sink.update(10, "Converting source audio");
            self.convert_to_wav(&input_path, &cache_wav).await?;
        }

        let spaced_wav = workdir.join(format!("{basename}-spaced.wav"));
        sink.update(15, "Inserting leading silence spacer");
        audio::prepend_spacer(&cache_wav, &spaced_wav, self.config.spacer_ms)?;

        let artifact_path = cache::diarization_artifact_path(&workdir, &basename);
        let turns = if artifact_path.is_file() {
            debug!("Reusing existing diarization artifact");
            artifact::read_artifact(&artifact_path)
                .map_err(|e| PipelineError::CacheInconsistency(format!("{e:#}")))?
        } else {
            sink.update(20, "Running speaker diarization");
            let turns = self.diarizer.diarize(&spaced_wav).await.map_err(|e| {
                PipelineError::Collaborator {
                    stage: "diarization",
                    message: format!("{e:#}"),
                }
            })?;
            artifact::write_artifact(&artifact_path, &turns)?;
            turns
        };

        sink.update(25, "Grouping speaker turns");
        let segments = group_turns(&turns);
        info!(
            turns = turns.len(),
            segments = segments.len(),
            "Diarization turns grouped"
        );

        sink.update(30, "Slicing segment audio");
        let slices = audio::slice_segments(&spaced_wav, &segments, &workdir)?;

        // Sequential per-segment transcription in segment order. The skip
        // check runs before each call, so tracks written by an interrupted
        // run are not re-transcribed.
        let total = slices.len().max(1);
        for (i, slice) in slices.iter().enumerate() {
            let track_path = cache::caption_track_path(&workdir, slice.segment_index);
            if track_path.is_file() {
                debug!(
                    segment = slice.segment_index,
                    "Caption track exists, skipping transcription"
                );
                continue;
            }

            sink.update(
                (30 + 60 * i / total) as u8,
                &format!("Transcribing segment {}/{}", i + 1, slices.len()),
            );
            let mut captions = self
                .asr
                .transcribe(&slice.path, self.config.language.as_deref())
                .await
                .map_err(|e| PipelineError::Collaborator {
                    stage: "transcription",
                    message: format!("{e:#}"),
                })?;
            captions.retain(|c| {
                let text = c.text.trim();
                !text.is_empty() && !is_hallucination(text)
            });
            vtt::write_track(&track_path, &captions)?;
        }

        sink.update(90, "Assembling transcript");
        let sections = self.assemble_sections(&workdir, &basename, &segments, speaker_names);

        sink.update(95, "Rendering transcript");
        let html_path = self
            .config
            .transcription_dir
            .join(format!("{basename}.html"));
        html::write_html(&html_path, input_file_name, input_file_name, &sections)?;

        self.export_document(&html_path).await;

        // Intermediates go; the diarization artifact and caption tracks
        // stay as the durable cache.
        let mut intermediates = vec![cache_wav, spaced_wav];
        intermediates.extend(slices.iter().map(|s| s.path.clone()));
        for file in intermediates {
            if let Err(e) = std::fs::remove_file(&file) {
                warn!(file = %file.display(), "Failed to remove intermediate: {e}");
            }
        }

        info!(basename = %basename, html = %html_path.display(), "Pipeline finished");
        Ok(PipelineOutcome {
            basename,
            html_path,
            segment_count: segments.len(),
            reused_cache: false,
        })
    }

    /// Regenerates the rendered transcript from cached artifacts alone.
    ///
    /// Also the re-render path after speaker-name updates. Returns
    /// `CacheInconsistency` when the artifacts cannot carry a
    /// regeneration, so `run` can fall back to a full pipeline.
    pub fn regenerate_from_cache(
        &self,
        basename: &str,
        media_file: &str,
        speaker_names: Option<&[String]>,
    ) -> Result<PipelineOutcome, PipelineError> {
        let workdir = self.config.transcription_dir.join(basename);
        let artifact_path = cache::diarization_artifact_path(&workdir, basename);
        let turns = artifact::read_artifact(&artifact_path)
            .map_err(|e| PipelineError::CacheInconsistency(format!("{e:#}")))?;
        if turns.is_empty() {
            return Err(PipelineError::CacheInconsistency(format!(
                "Diarization artifact '{}' holds no turns",
                artifact_path.display()
            )));
        }

        let segments = group_turns(&turns);
        let tracks = cache::list_caption_tracks(&workdir);
        if tracks.is_empty() {
            return Err(PipelineError::CacheInconsistency(
                "No caption tracks to regenerate from".to_string(),
            ));
        }
        if let Some((stray, _)) = tracks.iter().find(|(i, _)| *i >= segments.len()) {
            warn!(
                track = stray,
                segments = segments.len(),
                "Caption track has no matching segment, ignoring"
            );
        }

        let sections = self.assemble_sections(&workdir, basename, &segments, speaker_names);
        let html_path = self
            .config
            .transcription_dir
            .join(format!("{basename}.html"));
        html::write_html(&html_path, media_file, media_file, &sections)?;

        Ok(PipelineOutcome {
            basename: basename.to_string(),
            html_path,
            segment_count: segments.len(),
            reused_cache: true,
        })
    }

    /// The media file a basename's transcript should link to.
    pub fn media_file_for(&self, basename: &str) -> String {
        for ext in MEDIA_EXTENSIONS {
            let candidate = format!("{basename}.{ext}");
            if self.config.transcription_dir.join(&candidate).is_file() {
                return candidate;
            }
        }
        format!("{basename}.mp4")
    }

    fn assemble_sections(
        &self,
        workdir: &Path,
        basename: &str,
        segments: &[Segment],
        speaker_names: Option<&[String]>,
    ) -> Vec<TranscriptSection> {
        let styles = self.resolve_styles(workdir, basename, speaker_names);

        let mut ordered: Vec<&Segment> = segments.iter().collect();
        ordered.sort_by_key(|s| s.index);

        let mut aligner = CaptionAligner::new(self.config.spacer_ms);
        let mut aligned = HashMap::new();
        for segment in ordered {
            let track_path = cache::caption_track_path(workdir, segment.index);
            if !track_path.is_file() {
                debug!(segment = segment.index, "No caption track for segment");
                continue;
            }
            match vtt::read_track(&track_path, segment.index) {
                Ok(track) => {
                    aligned.insert(segment.index, aligner.align(segment, &track));
                }
                Err(e) => warn!("Skipping unreadable caption track: {e}"),
            }
        }

        transcript::assemble(segments, aligned, &styles)
    }

    fn resolve_styles(
        &self,
        workdir: &Path,
        basename: &str,
        speaker_names: Option<&[String]>,
    ) -> SpeakerStyles {
        if let Some(names) = speaker_names
            && !names.is_empty()
        {
            return SpeakerStyles::from_names(names);
        }
        let config_path = cache::speaker_config_path(workdir, basename);
        if config_path.is_file() {
            match SpeakerStyles::load(&config_path) {
                Ok(styles) => return styles,
                Err(e) => warn!("Ignoring unreadable speaker config: {e}"),
            }
        }
        SpeakerStyles::defaults()
    }

    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<(), PipelineError> {
        // WAV sources skip the decoder entirely.
        if input
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
        {
            std::fs::copy(input, output)?;
            return Ok(());
        }

        let result = tokio::process::Command::new(&self.config.ffmpeg)
            .arg("-i")
            .arg(input)
            .arg(output)
            .output()
            .await
            .map_err(|e| PipelineError::Collaborator {
                stage: "audio conversion",
                message: format!("Failed to run '{}': {}", self.config.ffmpeg, e),
            })?;
        if !result.status.success() {
            return Err(PipelineError::Collaborator {
                stage: "audio conversion",
                message: format!(
                    "'{}' exited with {}: {}",
                    self.config.ffmpeg,
                    result.status,
                    String::from_utf8_lossy(&result.stderr).trim()
                ),
            });
        }
        Ok(())
    }

    /// Optional document export after rendering. Failures are logged and
    /// never fail the job.
    async fn export_document(&self, html_path: &Path) {
        let Some(converter) = &self.config.docx_converter else {
            return;
        };
        let docx_path = html_path.with_extension("docx");
        match tokio::process::Command::new(converter)
            .arg(html_path)
            .arg(&docx_path)
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                info!(docx = %docx_path.display(), "Document export written");
            }
            Ok(output) => warn!(
                "Document converter exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => warn!("Failed to run document converter '{converter}': {e}"),
        }
    }
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Returns true for known ASR hallucination/placeholder outputs.
fn is_hallucination(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("[blank_audio]")
        || lower.contains("[silence]")
        || lower.contains("[music]")
        || lower.contains("(silence)")
        || lower.contains("(music)")
        || lower == "you"
        || lower == "thank you."
        || lower == "thanks for watching!"
}
