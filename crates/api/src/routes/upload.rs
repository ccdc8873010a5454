use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Deserialize;
use tracing::info;

use voxalign_transcription::Job;
use voxalign_transcription::pipeline::MEDIA_EXTENSIONS;

use crate::error::ApiError;
use crate::routes::sanitize_file_name;
use crate::state::AppState;
use crate::worker::spawn_transcription;

/// Accepts a media upload plus optional repeated `speaker` name fields,
/// persists the file and starts a transcription job.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Job>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut speakers: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::BadRequest("Upload has no file name".to_string()))?;
                let name = sanitize_file_name(&name)?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;

                let dest = state.settings.transcription_dir.join(&name);
                tokio::fs::write(&dest, &data)
                    .await
                    .map_err(|e| ApiError::Internal(format!("Failed to persist upload: {e}")))?;
                info!(file = %name, bytes = data.len(), "Upload persisted");
                file_name = Some(name);
            }
            Some("speaker") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid speaker field: {e}")))?;
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    speakers.push(trimmed.to_string());
                }
            }
            _ => {}
        }
    }

    let file_name =
        file_name.ok_or_else(|| ApiError::BadRequest("No file field in upload".to_string()))?;

    let job = state.jobs.create(&file_name);
    spawn_transcription(state, job.id.clone(), file_name, speakers);
    Ok(Json(job))
}

#[derive(Debug, Deserialize)]
pub struct RerunRequest {
    pub filename: String,
    #[serde(default)]
    pub speakers: Vec<String>,
}

/// Re-runs transcription for a media file already in the transcription
/// directory.
pub async fn rerun(
    State(state): State<AppState>,
    Json(body): Json<RerunRequest>,
) -> Result<Json<Job>, ApiError> {
    let file_name = sanitize_file_name(&body.filename)?;

    let extension = std::path::Path::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !MEDIA_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::BadRequest(
            "Re-run is only supported for media files".to_string(),
        ));
    }

    if !state.settings.transcription_dir.join(&file_name).is_file() {
        return Err(ApiError::NotFound(format!("File not found: {file_name}")));
    }

    let job = state.jobs.create(&file_name);
    spawn_transcription(state, job.id.clone(), file_name, body.speakers);
    Ok(Json(job))
}
