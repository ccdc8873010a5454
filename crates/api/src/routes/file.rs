use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub modified: String,
}

/// Lists the files in the transcription directory (uploads, rendered
/// transcripts, exports). Working directories are omitted.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<FileEntry>>, ApiError> {
    let dir = std::fs::read_dir(&state.settings.transcription_dir)
        .map_err(|e| ApiError::Internal(format!("Failed to read transcription dir: {e}")))?;

    let mut entries = Vec::new();
    for entry in dir.flatten() {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: metadata.len(),
            modified,
        });
    }

    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(Json(entries))
}
