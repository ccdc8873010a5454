use std::path::{Path, PathBuf};

/// Reuse decision computed fresh at the start of each run. A decision,
/// not data: never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheState {
    pub has_diarization_artifact: bool,
    pub caption_track_count: usize,
    pub is_reusable: bool,
}

impl CacheState {
    /// Inspects a working directory.
    ///
    /// A run is reusable only when the diarization artifact and at least
    /// one caption track both exist; any other combination (including an
    /// artifact with zero tracks) is treated conservatively as not
    /// reusable, forcing a full re-run rather than guessing.
    pub fn inspect(workdir: &Path, basename: &str) -> Self {
        let has_diarization_artifact =
            diarization_artifact_path(workdir, basename).is_file();
        let caption_track_count = list_caption_tracks(workdir).len();
        Self {
            has_diarization_artifact,
            caption_track_count,
            is_reusable: has_diarization_artifact && caption_track_count > 0,
        }
    }
}

/// Durable cache key 1: the diarization artifact.
pub fn diarization_artifact_path(workdir: &Path, basename: &str) -> PathBuf {
    workdir.join(format!("{basename}-diarization.txt"))
}

/// Durable cache key 2: one caption track per segment index.
pub fn caption_track_path(workdir: &Path, segment_index: usize) -> PathBuf {
    workdir.join(format!("{segment_index}.vtt"))
}

/// Persisted speaker display-name config.
pub fn speaker_config_path(workdir: &Path, basename: &str) -> PathBuf {
    workdir.join(format!("{basename}-speakers.json"))
}

/// Numeric caption tracks in a working directory, sorted by segment index.
///
/// Only files named `<number>.vtt` count; anything else in the directory
/// is ignored.
pub fn list_caption_tracks(workdir: &Path) -> Vec<(usize, PathBuf)> {
    let mut tracks = Vec::new();
    let Ok(entries) = std::fs::read_dir(workdir) else {
        return tracks;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("vtt") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(index) = stem.parse::<usize>() else {
            continue;
        };
        tracks.push((index, path));
    }
    tracks.sort_by_key(|(index, _)| *index);
    tracks
}
