use serde::{Deserialize, Serialize};

use super::RawTurn;

/// A contiguous run of turns attributed to one speaker: the unit of audio
/// slicing and independent transcription.
///
/// Immutable after grouping. `index` is the stable join key to the
/// segment's audio slice (`<index>.wav`) and caption track (`<index>.vtt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub speaker: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub turns: Vec<RawTurn>,
}

impl Segment {
    fn from_turns(index: usize, turns: Vec<RawTurn>) -> Self {
        let speaker = turns[0].speaker.clone();
        let start_ms = turns.iter().map(|t| t.start_ms).min().unwrap_or(0);
        let end_ms = turns.iter().map(|t| t.end_ms).max().unwrap_or(0);
        Self {
            index,
            speaker,
            start_ms,
            end_ms,
            turns,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Groups diarization turns into speaker-homogeneous segments.
///
/// Turns arrive in detection order. A speaker change closes the open
/// group. A turn whose end falls below the running end watermark lies
/// wholly inside time already covered (a known diarization output quirk);
/// the group is force-closed right after that turn and the watermark
/// starts over at zero. Segments come out in input order, which is not
/// necessarily time order.
pub fn group_turns(turns: &[RawTurn]) -> Vec<Segment> {
    let mut groups: Vec<Vec<RawTurn>> = Vec::new();
    let mut open: Vec<RawTurn> = Vec::new();
    let mut last_end: u64 = 0;

    for turn in turns {
        if open.first().is_some_and(|first| first.speaker != turn.speaker) {
            groups.push(std::mem::take(&mut open));
        }
        open.push(turn.clone());

        if turn.end_ms < last_end {
            groups.push(std::mem::take(&mut open));
            last_end = 0;
        } else {
            last_end = turn.end_ms;
        }
    }
    if !open.is_empty() {
        groups.push(open);
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(index, turns)| Segment::from_turns(index, turns))
        .collect()
}
