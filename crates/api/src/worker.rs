use tracing::error;

use voxalign_transcription::PipelineError;
use voxalign_transcription::job::RegistryProgress;

use crate::state::AppState;

/// Spawns the pipeline for a job on its own task.
///
/// Progress flows into the registry through a sink. The terminal
/// transition happens here: `completed` only once the rendered transcript
/// is confirmed written, `error` on any failure with the collaborator's
/// raw output preserved.
pub fn spawn_transcription(
    state: AppState,
    job_id: String,
    filename: String,
    speakers: Vec<String>,
) {
    tokio::spawn(async move {
        let sink = RegistryProgress::new(state.jobs.clone(), job_id.clone());
        let names = (!speakers.is_empty()).then_some(speakers);

        match state.pipeline.run(&filename, names.as_deref(), &sink).await {
            Ok(outcome) => {
                let result = format!("/files/{}.html", outcome.basename);
                state.jobs.complete(&job_id, &result);
            }
            Err(e) => {
                error!(job = %job_id, filename = %filename, "Transcription failed: {e}");
                let detail = match &e {
                    PipelineError::Collaborator { message, .. } => Some(message.clone()),
                    _ => None,
                };
                state.jobs.fail(&job_id, &e.to_string(), detail);
            }
        }
    });
}
