use serde::Serialize;

use crate::diarization::Segment;
use crate::vtt::{Caption, CaptionTrack};

/// A caption translated onto the absolute recording timeline.
///
/// Derived on demand from a `Segment` + `Caption`; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AlignedCaption {
    pub segment_index: usize,
    pub caption_index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// Translates segment-relative captions onto the absolute timeline.
///
/// Shift-back convention, applied uniformly: the spacer inserted before
/// analysis is subtracted from the segment start (clamped at zero) and the
/// result shifts every caption of that segment. Rendering anchors and
/// edit-time lookups both go through this type, so an absolute time
/// derived from one always resolves through the other.
///
/// A watermark keeps absolute starts monotonically non-decreasing across
/// segments aligned in index order; ends are clamped to their starts.
#[derive(Debug)]
pub struct CaptionAligner {
    spacer_ms: u64,
    watermark_ms: u64,
}

impl CaptionAligner {
    pub fn new(spacer_ms: u64) -> Self {
        Self {
            spacer_ms,
            watermark_ms: 0,
        }
    }

    /// The absolute-timeline shift for a segment's captions:
    /// `max(segment.start_ms - spacer_ms, 0)`.
    pub fn segment_shift(&self, segment: &Segment) -> u64 {
        segment.start_ms.saturating_sub(self.spacer_ms)
    }

    /// Aligns one segment's caption track.
    pub fn align(&mut self, segment: &Segment, track: &CaptionTrack) -> Vec<AlignedCaption> {
        self.align_with_shift(self.segment_shift(segment), segment.index, &track.captions)
    }

    /// Aligns captions under an explicit shift. Used directly by the edit
    /// reconciler when a track has no matching segment (shift zero).
    pub fn align_with_shift(
        &mut self,
        shift_ms: u64,
        segment_index: usize,
        captions: &[Caption],
    ) -> Vec<AlignedCaption> {
        let mut aligned = Vec::with_capacity(captions.len());
        for (caption_index, caption) in captions.iter().enumerate() {
            let start_ms = (shift_ms + caption.start_ms).max(self.watermark_ms);
            let end_ms = (shift_ms + caption.end_ms).max(start_ms);
            self.watermark_ms = start_ms;
            aligned.push(AlignedCaption {
                segment_index,
                caption_index,
                start_ms,
                end_ms,
                text: caption.text.clone(),
            });
        }
        aligned
    }
}
