//! Audio resampling using rubato
//!
//! Converts a clip to the rate its encoder is driven at.

use crate::error::{ExportError, Result};
use rubato::{FftFixedIn, Resampler};
use serde::{Deserialize, Serialize};

/// Resampling quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleQuality {
    /// Fast resampling (lower quality)
    Fast,
    /// Balanced quality/speed (default)
    #[default]
    Medium,
    /// High quality
    High,
    /// Best quality (slowest)
    Best,
}

impl ResampleQuality {
    fn chunk_size(&self) -> usize {
        match self {
            ResampleQuality::Fast => 512,
            ResampleQuality::Medium => 1024,
            ResampleQuality::High => 2048,
            ResampleQuality::Best => 4096,
        }
    }

    fn sub_chunks(&self) -> usize {
        match self {
            ResampleQuality::Fast => 1,
            ResampleQuality::Medium => 2,
            ResampleQuality::High => 4,
            ResampleQuality::Best => 8,
        }
    }
}

/// Resample planar channels from `source_rate` to `target_rate`.
///
/// Output length is `ceil(frames * target / source)`. The resampler's
/// group delay is trimmed from the front so clip boundaries stay aligned.
pub fn resample(
    channels: &[Vec<f32>],
    source_rate: u32,
    target_rate: u32,
    quality: ResampleQuality,
) -> Result<Vec<Vec<f32>>> {
    if source_rate == target_rate {
        return Ok(channels.to_vec());
    }
    if source_rate == 0 || target_rate == 0 {
        return Err(ExportError::InvalidData(format!(
            "cannot resample {source_rate} Hz to {target_rate} Hz"
        )));
    }

    let num_channels = channels.len();
    let input_frames = channels.first().map_or(0, Vec::len);
    if channels.iter().any(|c| c.len() != input_frames) {
        return Err(ExportError::InvalidData(
            "Channels have different lengths".into(),
        ));
    }
    if num_channels == 0 || input_frames == 0 {
        return Ok(vec![Vec::new(); num_channels]);
    }

    let chunk_size = quality.chunk_size();
    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        chunk_size,
        quality.sub_chunks(),
        num_channels,
    )?;

    let expected_output_frames =
        (input_frames as f64 * target_rate as f64 / source_rate as f64).ceil() as usize;
    let delay = resampler.output_delay();

    let mut output: Vec<Vec<f32>> = (0..num_channels)
        .map(|_| Vec::with_capacity(expected_output_frames + delay + chunk_size))
        .collect();

    // Keep feeding zero-padded chunks until the delayed tail has been flushed.
    let mut pos = 0;
    while pos < input_frames || output[0].len() < expected_output_frames + delay {
        let needed = resampler.input_frames_next();
        let copy = input_frames.saturating_sub(pos).min(needed);

        let chunk: Vec<Vec<f32>> = channels
            .iter()
            .map(|c| {
                let mut lane = vec![0.0f32; needed];
                if copy > 0 {
                    lane[..copy].copy_from_slice(&c[pos..pos + copy]);
                }
                lane
            })
            .collect();

        let processed = resampler.process(&chunk, None)?;
        for (out, lane) in output.iter_mut().zip(processed.iter()) {
            out.extend_from_slice(lane);
        }
        pos += needed;
    }

    for lane in &mut output {
        lane.drain(..delay.min(lane.len()));
        lane.truncate(expected_output_frames);
    }

    Ok(output)
}
