use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use voxalign_api::state::AppState;
use voxalign_config::Settings;
use voxalign_transcription::asr::CommandAsr;
use voxalign_transcription::diarization::CommandDiarizer;
use voxalign_transcription::{JobRegistry, PipelineConfig, TranscriptionPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load()?;
    std::fs::create_dir_all(&settings.transcription_dir)?;

    if settings.diarizer.program.is_empty() || settings.asr.program.is_empty() {
        anyhow::bail!(
            "Diarizer and ASR collaborator commands must be configured (voxalign.toml or VOXALIGN_* env)"
        );
    }

    let pipeline = TranscriptionPipeline::new(
        Arc::new(CommandDiarizer::new(
            settings.diarizer.program.clone(),
            settings.diarizer.args.clone(),
        )),
        Arc::new(CommandAsr::new(
            settings.asr.program.clone(),
            settings.asr.args.clone(),
        )),
        PipelineConfig {
            transcription_dir: settings.transcription_dir.clone(),
            spacer_ms: settings.spacer_ms,
            language: Some(settings.language.clone()),
            ffmpeg: settings.ffmpeg.clone(),
            docx_converter: settings.docx_converter.clone(),
        },
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState {
        settings: Arc::new(settings),
        jobs: JobRegistry::new(),
        pipeline: Arc::new(pipeline),
    };

    let app = voxalign_api::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "voxalign API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
