//! Waveform Analysis
//!
//! Min/max summaries of a decoded buffer for drawing the waveform.
//!
//! The summarized signal is the average of the first two channels (a mono
//! source is averaged with itself), so a summary has one lane regardless of
//! the source channel count.

use cropper_core::DecodedBuffer;

/// A single block of waveform summary data
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct WaveformBlock {
    /// Minimum sample value in this block
    pub min: f32,
    /// Maximum sample value in this block
    pub max: f32,
}

/// Waveform summary of the averaged signal
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct WaveformSummary {
    /// Summary blocks
    pub blocks: Vec<WaveformBlock>,
    /// Number of frames per block
    pub samples_per_block: usize,
    /// Total number of frames summarized
    pub total_samples: usize,
}

impl WaveformSummary {
    fn with_capacity(samples_per_block: usize, num_blocks: usize) -> Self {
        Self {
            blocks: Vec::with_capacity(num_blocks),
            samples_per_block,
            total_samples: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[inline]
fn averaged(left: &[f32], right: &[f32], frame: usize) -> f32 {
    (left[frame] + right[frame]) * 0.5
}

/// Statistics for frames `[start, end)`. Empty ranges give a zero block.
fn compute_block(left: &[f32], right: &[f32], start: usize, end: usize) -> WaveformBlock {
    if start >= end {
        return WaveformBlock::default();
    }

    let mut min = f32::MAX;
    let mut max = f32::MIN;

    for frame in start..end {
        let v = averaged(left, right, frame);
        min = min.min(v);
        max = max.max(v);
    }

    WaveformBlock { min, max }
}

fn lanes(buffer: &DecodedBuffer) -> (&[f32], &[f32]) {
    let left = buffer.channel(0).unwrap_or(&[]);
    let right = buffer.channel(1).unwrap_or(left);
    (left, right)
}

/// Exactly `columns` blocks of `max(1, frames / columns)` frames each.
///
/// Frames past the last full column are not summarized; columns past the
/// end of a short buffer are zero blocks.
pub fn column_summary(buffer: &DecodedBuffer, columns: usize) -> WaveformSummary {
    let frames = buffer.frames();
    let samples_per_block = if columns == 0 {
        1
    } else {
        (frames / columns).max(1)
    };

    let (left, right) = lanes(buffer);
    let mut summary = WaveformSummary::with_capacity(samples_per_block, columns);
    summary.total_samples = frames;

    for column in 0..columns {
        let start = (column * samples_per_block).min(frames);
        let end = (start + samples_per_block).min(frames);
        summary.blocks.push(compute_block(left, right, start, end));
    }

    summary
}
