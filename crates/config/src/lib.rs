use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

/// External collaborator command: a program plus fixed leading arguments.
/// The pipeline appends the audio file path (and, for ASR, a language flag).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollaboratorCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Top-level settings for the transcription service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    /// Directory that holds uploads, per-file working directories and
    /// rendered transcripts.
    #[serde(default = "default_transcription_dir")]
    pub transcription_dir: PathBuf,
    /// Artificial silence prepended before diarization, in milliseconds.
    #[serde(default = "default_spacer_ms")]
    pub spacer_ms: u64,
    /// Language hint passed to the ASR collaborator (ISO 639-1).
    #[serde(default = "default_language")]
    pub language: String,
    /// Speaker-diarization collaborator; must print turn records
    /// (`start --> end speakerLabel`) on stdout.
    pub diarizer: CollaboratorCommand,
    /// ASR collaborator; must print a WebVTT caption track on stdout.
    pub asr: CollaboratorCommand,
    /// Audio container decoder (ffmpeg or compatible).
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    /// Optional HTML-to-document converter, invoked as
    /// `<program> <input.html> <output.docx>` after rendering.
    #[serde(default)]
    pub docx_converter: Option<String>,
}

fn default_transcription_dir() -> PathBuf {
    PathBuf::from("transcription-files")
}

fn default_spacer_ms() -> u64 {
    2000
}

fn default_language() -> String {
    "en".to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            transcription_dir: default_transcription_dir(),
            spacer_ms: default_spacer_ms(),
            language: default_language(),
            diarizer: CollaboratorCommand::default(),
            asr: CollaboratorCommand::default(),
            ffmpeg: default_ffmpeg(),
            docx_converter: None,
        }
    }
}

impl Settings {
    /// Loads settings from `voxalign.toml` (if present) layered with
    /// `VOXALIGN_*` environment variables (e.g. `VOXALIGN_SERVER__PORT`).
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("voxalign").required(false))
            .add_source(
                config::Environment::with_prefix("VOXALIGN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
