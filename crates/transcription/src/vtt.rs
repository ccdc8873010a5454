use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fsutil::write_atomic;
use crate::timecode::{format_timecode, parse_timecode};

/// One timestamped line of recognized text, timed relative to the start of
/// its segment's audio slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// A per-segment caption track.
///
/// A caption's index is its position in the track file; it is the stable
/// identifier for edits and is never recomputed by re-sorting at read time.
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    pub segment_index: usize,
    pub captions: Vec<Caption>,
}

/// Parses the WebVTT subset this pipeline produces: a `WEBVTT` header
/// followed by blank-line-separated `start --> end` + text blocks.
///
/// Cue identifier lines and cue settings after the end timestamp are
/// tolerated; blocks without a parseable timestamp line are skipped.
pub fn parse_track(content: &str) -> Vec<Caption> {
    let mut captions = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let Some((start_raw, end_raw)) = line.split_once("-->") else {
            continue;
        };
        let end_token = end_raw.split_whitespace().next().unwrap_or("");
        let (Some(start_ms), Some(end_ms)) =
            (parse_timecode(start_raw), parse_timecode(end_token))
        else {
            continue;
        };

        let mut text_parts = Vec::new();
        while lines.peek().is_some_and(|l| !l.trim().is_empty()) {
            text_parts.push(lines.next().unwrap().trim());
        }

        captions.push(Caption {
            start_ms,
            end_ms,
            text: text_parts.join(" "),
        });
    }

    captions
}

/// Reads a caption track file, preserving file order.
pub fn read_track(path: impl AsRef<Path>, segment_index: usize) -> anyhow::Result<CaptionTrack> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read caption track '{}': {}",
            path.as_ref().display(),
            e
        )
    })?;
    Ok(CaptionTrack {
        segment_index,
        captions: parse_track(&content),
    })
}

/// Renders captions in the track file format.
pub fn render_track(captions: &[Caption]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for caption in captions {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            format_timecode(caption.start_ms),
            format_timecode(caption.end_ms),
            caption.text
        ));
    }
    out
}

/// Rewrites a whole caption track atomically.
pub fn write_track(path: impl AsRef<Path>, captions: &[Caption]) -> std::io::Result<()> {
    write_atomic(path.as_ref(), render_track(captions).as_bytes())
}
