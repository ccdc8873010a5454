use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::align::AlignedCaption;
use crate::diarization::Segment;
use crate::fsutil::write_atomic;

/// Presentation attributes for one speaker label. Not part of any
/// alignment invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerStyle {
    pub name: String,
    pub bgcolor: String,
    pub textcolor: String,
}

/// Mapping of diarization speaker labels to display styles.
#[derive(Debug, Clone, Default)]
pub struct SpeakerStyles {
    styles: HashMap<String, SpeakerStyle>,
}

impl SpeakerStyles {
    /// Built-in styles for the first three diarization labels.
    pub fn defaults() -> Self {
        let mut styles = HashMap::new();
        styles.insert(
            "SPEAKER_00".to_string(),
            style("Speaker 1", "lightgray", "darkorange"),
        );
        styles.insert(
            "SPEAKER_01".to_string(),
            style("Speaker 2", "#e1ffc7", "darkgreen"),
        );
        styles.insert(
            "SPEAKER_02".to_string(),
            style("Speaker 3", "#e1ffc7", "darkblue"),
        );
        Self { styles }
    }

    /// Styles for caller-supplied names, assigned to labels in diarization
    /// order (`SPEAKER_00`, `SPEAKER_01`, ...).
    pub fn from_names(names: &[String]) -> Self {
        let styles = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                (
                    format!("SPEAKER_{i:02}"),
                    style(name, "lightgray", "darkorange"),
                )
            })
            .collect();
        Self { styles }
    }

    /// Resolves a label, falling back to the label itself in the default
    /// colors for speakers beyond the configured set.
    pub fn resolve(&self, label: &str) -> SpeakerStyle {
        self.styles
            .get(label)
            .cloned()
            .unwrap_or_else(|| style(label, "white", "orange"))
    }

    /// Renames speakers by matching current display names, as submitted by
    /// the speaker-update interface.
    pub fn rename(&mut self, mapping: &HashMap<String, String>) {
        for entry in self.styles.values_mut() {
            if let Some(new_name) = mapping.get(&entry.name) {
                entry.name = new_name.clone();
            }
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read speaker config '{}': {}", path.display(), e)
        })?;
        let styles: HashMap<String, SpeakerStyle> = serde_json::from_str(&content)?;
        Ok(Self { styles })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(&self.styles)?;
        write_atomic(path, &json)?;
        Ok(())
    }
}

fn style(name: &str, bgcolor: &str, textcolor: &str) -> SpeakerStyle {
    SpeakerStyle {
        name: name.to_string(),
        bgcolor: bgcolor.to_string(),
        textcolor: textcolor.to_string(),
    }
}

/// One block of the assembled transcript: a segment with its resolved
/// speaker style and absolute-timeline captions.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptSection {
    pub segment_index: usize,
    pub speaker: String,
    pub style: SpeakerStyle,
    pub captions: Vec<AlignedCaption>,
}

/// Orders segments by assigned index and attaches their aligned captions
/// and styles.
///
/// Deterministic: identical inputs produce identical output. Adjacent
/// sections sharing a speaker stay separate; any fusion already happened
/// (or deliberately didn't) in the grouper.
pub fn assemble(
    segments: &[Segment],
    mut aligned: HashMap<usize, Vec<AlignedCaption>>,
    styles: &SpeakerStyles,
) -> Vec<TranscriptSection> {
    let mut ordered: Vec<&Segment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.index);

    ordered
        .into_iter()
        .map(|segment| TranscriptSection {
            segment_index: segment.index,
            speaker: segment.speaker.clone(),
            style: styles.resolve(&segment.speaker),
            captions: aligned.remove(&segment.index).unwrap_or_default(),
        })
        .collect()
}
