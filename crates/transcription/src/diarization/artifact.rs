use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::RawTurn;
use crate::fsutil::write_atomic;
use crate::timecode::{format_timecode, parse_timecode};

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+:[0-9]+:[0-9]+\.[0-9]+").unwrap());

/// Parses diarization artifact lines into turns.
///
/// Accepts both the bracketed form pyannote-style pipelines print
/// (`[ 00:00:02.148 -->  00:00:04.483] A SPEAKER_00`) and the plain form
/// this crate writes (`00:00:02.148 --> 00:00:04.483 SPEAKER_00`): the
/// first two timestamps on a line are the bounds and the last
/// whitespace-separated token is the speaker label. Lines without two
/// timestamps are skipped. Timestamps are parsed once here; the string
/// form never travels further down the pipeline.
pub fn parse_artifact(content: &str) -> Vec<RawTurn> {
    let mut turns = Vec::new();
    for line in content.lines() {
        let mut times = TIMESTAMP_RE.find_iter(line);
        let (Some(start), Some(end)) = (times.next(), times.next()) else {
            continue;
        };
        let Some(speaker) = line.split_whitespace().last() else {
            continue;
        };
        let (Some(start_ms), Some(end_ms)) = (
            parse_timecode(start.as_str()),
            parse_timecode(end.as_str()),
        ) else {
            continue;
        };
        turns.push(RawTurn {
            speaker: speaker.to_string(),
            start_ms,
            end_ms,
        });
    }
    turns
}

/// Reads and parses a diarization artifact file.
pub fn read_artifact(path: impl AsRef<Path>) -> anyhow::Result<Vec<RawTurn>> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read diarization artifact '{}': {}",
            path.as_ref().display(),
            e
        )
    })?;
    Ok(parse_artifact(&content))
}

/// Renders turns in the plain newline-delimited artifact form.
pub fn render_artifact(turns: &[RawTurn]) -> String {
    let mut out = String::new();
    for turn in turns {
        out.push_str(&format!(
            "{} --> {} {}\n",
            format_timecode(turn.start_ms),
            format_timecode(turn.end_ms),
            turn.speaker
        ));
    }
    out
}

/// Persists turns as the durable diarization cache artifact.
pub fn write_artifact(path: impl AsRef<Path>, turns: &[RawTurn]) -> std::io::Result<()> {
    write_atomic(path.as_ref(), render_artifact(turns).as_bytes())
}
