use axum::{
    Json,
    extract::{Path, State},
};

use voxalign_transcription::Job;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    state
        .jobs
        .get(&job_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Job not found: {job_id}")))
}
