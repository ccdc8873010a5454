use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voxalign_config::Settings;
use voxalign_transcription::asr::CommandAsr;
use voxalign_transcription::diarization::CommandDiarizer;
use voxalign_transcription::job::NullProgress;
use voxalign_transcription::{PipelineConfig, TranscriptionPipeline};

/// Diarize and transcribe a media file into a speaker-labeled HTML
/// transcript. Artifacts land next to the input: a `<basename>/` working
/// directory with the diarization artifact and per-segment caption
/// tracks, and a sibling `<basename>.html`.
#[derive(Debug, Parser)]
#[command(name = "voxalign", version)]
struct Args {
    /// Media file to transcribe.
    input: String,

    /// Optional speaker display names, in diarization label order.
    speakers: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::load()?;
    if settings.diarizer.program.is_empty() || settings.asr.program.is_empty() {
        anyhow::bail!(
            "Diarizer and ASR collaborator commands must be configured (voxalign.toml or VOXALIGN_* env)"
        );
    }

    let input = PathBuf::from(&args.input);
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid input path: {}", args.input))?;
    let dir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

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
            transcription_dir: dir,
            spacer_ms: settings.spacer_ms,
            language: Some(settings.language.clone()),
            ffmpeg: settings.ffmpeg.clone(),
            docx_converter: settings.docx_converter.clone(),
        },
    );

    let speakers = (!args.speakers.is_empty()).then_some(args.speakers.as_slice());
    let outcome = pipeline.run(&file_name, speakers, &NullProgress).await?;

    println!("Transcript written to {}", outcome.html_path.display());
    Ok(())
}
