use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::align::CaptionAligner;
use crate::cache::{diarization_artifact_path, list_caption_tracks};
use crate::diarization::{Segment, artifact, group_turns};
use crate::timecode::TimeSpec;
use crate::vtt::{self, Caption};

/// Window for tolerance matching when precise identifiers are absent.
pub const EDIT_MATCH_TOLERANCE_MS: u64 = 3000;

/// A caption index as submitted by clients: a number, or a stringified
/// number from form-encoded front ends.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndexSpec {
    Number(usize),
    Text(String),
}

impl IndexSpec {
    pub fn to_index(&self) -> Option<usize> {
        match self {
            IndexSpec::Number(n) => Some(*n),
            IndexSpec::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One user-submitted edit.
///
/// Precise edits carry `vttFile` + `captionIdx` (embedded in the rendered
/// transcript); legacy edits carry only an approximate start time and go
/// through tolerance matching.
#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    #[serde(default, rename = "vttFile")]
    pub vtt_file: Option<String>,
    #[serde(default, rename = "captionIdx")]
    pub caption_index: Option<IndexSpec>,
    #[serde(default)]
    pub start: Option<TimeSpec>,
    #[serde(default)]
    pub end: Option<TimeSpec>,
    #[serde(default)]
    pub text: String,
}

/// A per-edit failure. Failures never abort the batch.
#[derive(Debug, Clone, Serialize)]
pub struct EditFailure {
    /// Position of the edit in the submitted batch.
    pub index: usize,
    pub reason: String,
}

/// Batch outcome: applied count plus per-edit failures. Partial
/// application is expected and reported, never rolled back.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditReport {
    pub applied: usize,
    pub failed: Vec<EditFailure>,
}

struct TrackState {
    file_name: String,
    path: PathBuf,
    captions: Vec<Caption>,
    /// Absolute start per caption, derived through the same shift-back
    /// arithmetic the renderer uses.
    aligned_starts: Vec<u64>,
}

/// Applies a batch of edits against the caption tracks in `workdir`.
///
/// Each edit independently succeeds or fails; a matched caption has its
/// text replaced (trimmed) when different and the owning track file is
/// rewritten in full.
pub fn apply_edits(
    workdir: &Path,
    basename: &str,
    spacer_ms: u64,
    edits: &[EditRequest],
) -> anyhow::Result<EditReport> {
    if !workdir.is_dir() {
        anyhow::bail!("Transcript directory not found: {}", workdir.display());
    }

    let mut tracks = load_tracks(workdir, basename, spacer_ms);
    let mut report = EditReport::default();

    for (index, edit) in edits.iter().enumerate() {
        let target = match locate(&tracks, edit) {
            Ok(t) => t,
            Err(reason) => {
                debug!(edit = index, %reason, "Edit not applied");
                report.failed.push(EditFailure { index, reason });
                continue;
            }
        };

        let (track_pos, caption_pos) = target;
        let new_text = edit.text.trim();
        let track = &mut tracks[track_pos];
        if track.captions[caption_pos].text != new_text {
            track.captions[caption_pos].text = new_text.to_string();
            if let Err(e) = vtt::write_track(&track.path, &track.captions) {
                report.failed.push(EditFailure {
                    index,
                    reason: format!("Failed to rewrite {}: {}", track.file_name, e),
                });
                continue;
            }
            debug!(edit = index, track = %track.file_name, caption = caption_pos, "Caption updated");
        }
        report.applied += 1;
    }

    Ok(report)
}

/// Reads every numeric caption track and precomputes absolute start times.
///
/// Segment shifts come from the diarization artifact when present; a
/// missing artifact (tracks written directly, no pipeline run) degrades to
/// zero shift, under which caption times are already absolute.
fn load_tracks(workdir: &Path, basename: &str, spacer_ms: u64) -> Vec<TrackState> {
    let segments: HashMap<usize, Segment> = {
        let path = diarization_artifact_path(workdir, basename);
        if path.is_file() {
            match artifact::read_artifact(&path) {
                Ok(turns) => group_turns(&turns)
                    .into_iter()
                    .map(|s| (s.index, s))
                    .collect(),
                Err(e) => {
                    warn!("Ignoring unreadable diarization artifact: {e}");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        }
    };

    let mut aligner = CaptionAligner::new(spacer_ms);
    let mut tracks = Vec::new();
    for (segment_index, path) in list_caption_tracks(workdir) {
        let track = match vtt::read_track(&path, segment_index) {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping unreadable caption track: {e}");
                continue;
            }
        };
        let shift_ms = segments
            .get(&segment_index)
            .map(|s| s.start_ms.saturating_sub(spacer_ms))
            .unwrap_or(0);
        let aligned_starts = aligner
            .align_with_shift(shift_ms, segment_index, &track.captions)
            .into_iter()
            .map(|c| c.start_ms)
            .collect();
        tracks.push(TrackState {
            file_name: format!("{segment_index}.vtt"),
            path,
            captions: track.captions,
            aligned_starts,
        });
    }
    tracks
}

/// Resolves an edit to (track position, caption position).
fn locate(tracks: &[TrackState], edit: &EditRequest) -> Result<(usize, usize), String> {
    match (&edit.vtt_file, &edit.caption_index) {
        (Some(file), Some(index_spec)) => locate_precise(tracks, file, index_spec),
        (None, None) => locate_by_time(tracks, edit),
        _ => Err("Both vttFile and captionIdx are required for a precise edit".to_string()),
    }
}

fn locate_precise(
    tracks: &[TrackState],
    file: &str,
    index_spec: &IndexSpec,
) -> Result<(usize, usize), String> {
    // Submitted names resolve only against the listed tracks; a
    // traversal attempt never reaches the filesystem.
    let track_pos = tracks
        .iter()
        .position(|t| t.file_name == file.trim())
        .ok_or_else(|| format!("Caption track not found: {file}"))?;

    let caption_index = index_spec
        .to_index()
        .ok_or_else(|| format!("Invalid caption index: {index_spec:?}"))?;

    let len = tracks[track_pos].captions.len();
    if caption_index >= len {
        return Err(format!(
            "Caption index {caption_index} out of range (track has {len} captions)"
        ));
    }
    Ok((track_pos, caption_index))
}

fn locate_by_time(tracks: &[TrackState], edit: &EditRequest) -> Result<(usize, usize), String> {
    let target_ms = edit
        .start
        .as_ref()
        .and_then(|t| t.to_ms())
        .ok_or_else(|| "Missing or unparseable start time".to_string())?;

    let mut best: Option<(usize, usize, u64)> = None;
    for (track_pos, track) in tracks.iter().enumerate() {
        for (caption_pos, start_ms) in track.aligned_starts.iter().enumerate() {
            let diff = start_ms.abs_diff(target_ms);
            // Strict comparison keeps the first-found candidate on ties,
            // in track-iteration order.
            if best.is_none_or(|(_, _, best_diff)| diff < best_diff) {
                best = Some((track_pos, caption_pos, diff));
            }
        }
    }

    match best {
        Some((track_pos, caption_pos, diff)) if diff < EDIT_MATCH_TOLERANCE_MS => {
            Ok((track_pos, caption_pos))
        }
        _ => Err(format!(
            "No caption within {EDIT_MATCH_TOLERANCE_MS}ms of {target_ms}ms"
        )),
    }
}
