use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::diarization::Segment;
use crate::error::PipelineError;

/// One exported audio slice, keyed by its segment index.
#[derive(Debug, Clone)]
pub struct SegmentSlice {
    pub segment_index: usize,
    pub path: PathBuf,
}

/// Writes `dst` as `spacer_ms` of silence followed by `src`'s samples.
///
/// The spacer avoids diarization edge effects at t=0; downstream
/// timestamps are measured against the spaced buffer. Sample format,
/// rate and channel count are carried over untouched.
pub fn prepend_spacer(src: &Path, dst: &Path, spacer_ms: u64) -> Result<(), PipelineError> {
    let mut reader = hound::WavReader::open(src)?;
    let spec = reader.spec();
    let spacer_samples =
        (spacer_ms * spec.sample_rate as u64 / 1000) * spec.channels as u64;

    let tmp = tmp_path(dst);
    {
        let mut writer = hound::WavWriter::create(&tmp, spec)?;
        match spec.sample_format {
            hound::SampleFormat::Int => {
                for _ in 0..spacer_samples {
                    writer.write_sample(0i32)?;
                }
                for sample in reader.samples::<i32>() {
                    writer.write_sample(sample?)?;
                }
            }
            hound::SampleFormat::Float => {
                for _ in 0..spacer_samples {
                    writer.write_sample(0.0f32)?;
                }
                for sample in reader.samples::<f32>() {
                    writer.write_sample(sample?)?;
                }
            }
        }
        writer.finalize()?;
    }
    std::fs::rename(&tmp, dst)?;

    debug!(src = %src.display(), dst = %dst.display(), spacer_ms, "Spaced audio written");
    Ok(())
}

/// Slices the spaced recording into one WAV per segment.
///
/// Segment bounds are already expressed in the spaced buffer's coordinate
/// space. Slicing is sample-accurate with no resampling or re-encoding.
/// A zero/negative-duration segment is logged and skipped; the run keeps
/// going and the surviving slices keep their segment indexes.
pub fn slice_segments(
    spaced_wav: &Path,
    segments: &[Segment],
    workdir: &Path,
) -> Result<Vec<SegmentSlice>, PipelineError> {
    let mut reader = hound::WavReader::open(spaced_wav)?;
    let spec = reader.spec();
    let total_frames = reader.duration() as u64;
    let mut slices = Vec::new();

    for segment in segments {
        if segment.end_ms <= segment.start_ms {
            warn!(
                segment = segment.index,
                start_ms = segment.start_ms,
                end_ms = segment.end_ms,
                "Degenerate segment, skipping slice"
            );
            continue;
        }

        let start_frame = (segment.start_ms * spec.sample_rate as u64 / 1000).min(total_frames);
        let end_frame = (segment.end_ms * spec.sample_rate as u64 / 1000).min(total_frames);
        if end_frame <= start_frame {
            warn!(
                segment = segment.index,
                "Segment lies outside the recording, skipping slice"
            );
            continue;
        }

        let path = workdir.join(format!("{}.wav", segment.index));
        let tmp = tmp_path(&path);
        reader.seek(start_frame as u32)?;
        let sample_count = ((end_frame - start_frame) * spec.channels as u64) as usize;
        {
            let mut writer = hound::WavWriter::create(&tmp, spec)?;
            match spec.sample_format {
                hound::SampleFormat::Int => {
                    for sample in reader.samples::<i32>().take(sample_count) {
                        writer.write_sample(sample?)?;
                    }
                }
                hound::SampleFormat::Float => {
                    for sample in reader.samples::<f32>().take(sample_count) {
                        writer.write_sample(sample?)?;
                    }
                }
            }
            writer.finalize()?;
        }
        std::fs::rename(&tmp, &path)?;

        slices.push(SegmentSlice {
            segment_index: segment.index,
            path,
        });
    }

    Ok(slices)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
