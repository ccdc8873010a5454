use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use voxalign_transcription::cache::speaker_config_path;
use voxalign_transcription::{
    EditRequest, PipelineError, SpeakerStyles, apply_edits, edit::EditFailure,
};

use crate::error::ApiError;
use crate::routes::sanitize_file_name;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EditBatchRequest {
    #[serde(default)]
    pub changes: Vec<EditRequest>,
}

#[derive(Debug, Serialize)]
pub struct EditBatchResponse {
    pub success: bool,
    pub applied: usize,
    pub failed: Vec<EditFailure>,
}

/// Applies a batch of transcript edits against the per-segment caption
/// tracks. Each edit independently succeeds or fails; the response
/// reports both.
pub async fn save_edits(
    State(state): State<AppState>,
    Path(basename): Path<String>,
    Json(body): Json<EditBatchRequest>,
) -> Result<Json<EditBatchResponse>, ApiError> {
    let basename = sanitize_file_name(&basename)?;
    if body.changes.is_empty() {
        return Err(ApiError::BadRequest("No changes provided".to_string()));
    }

    let workdir = state.settings.transcription_dir.join(&basename);
    if !workdir.is_dir() {
        return Err(ApiError::NotFound(format!(
            "Transcript directory not found: {basename}"
        )));
    }

    let report = apply_edits(&workdir, &basename, state.settings.spacer_ms, &body.changes)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(EditBatchResponse {
        success: true,
        applied: report.applied,
        failed: report.failed,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSpeakersRequest {
    /// Current display name → new display name.
    pub speakers: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSpeakersResponse {
    pub success: bool,
    pub message: String,
}

/// Updates the persisted speaker-name config and re-renders the
/// transcript from the cached artifacts.
pub async fn update_speakers(
    State(state): State<AppState>,
    Path(basename): Path<String>,
    Json(body): Json<UpdateSpeakersRequest>,
) -> Result<Json<UpdateSpeakersResponse>, ApiError> {
    let basename = sanitize_file_name(&basename)?;
    if body.speakers.is_empty() {
        return Err(ApiError::BadRequest("Missing speakers mapping".to_string()));
    }

    let workdir = state.settings.transcription_dir.join(&basename);
    if !workdir.is_dir() {
        return Err(ApiError::NotFound(format!(
            "Transcript directory not found: {basename}"
        )));
    }

    let config_path = speaker_config_path(&workdir, &basename);
    let mut styles = if config_path.is_file() {
        SpeakerStyles::load(&config_path).map_err(|e| ApiError::Internal(e.to_string()))?
    } else {
        SpeakerStyles::defaults()
    };
    styles.rename(&body.speakers);
    styles
        .save(&config_path)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    // Re-render with the new names when the cache allows it; a saved
    // config alone is still a success.
    let media = state.pipeline.media_file_for(&basename);
    match state.pipeline.regenerate_from_cache(&basename, &media, None) {
        Ok(_) => {}
        Err(PipelineError::CacheInconsistency(reason)) => {
            warn!(%reason, "Speaker config saved without re-render");
        }
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    }

    Ok(Json(UpdateSpeakersResponse {
        success: true,
        message: format!("Updated speaker config: {basename}-speakers.json"),
    }))
}
