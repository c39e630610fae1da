//! Decoded PCM buffer and the format descriptor derived from it.

use crate::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a decoded buffer, used as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

/// Immutable planar PCM. Once built it is only ever shared behind an `Arc`.
#[derive(Debug)]
pub struct DecodedBuffer {
    id: BufferId,
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
    frames: usize,
}

impl DecodedBuffer {
    /// Build from planar channel data. All channels must have the same length.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(Error::InvalidBuffer("buffer has no channels".into()));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidBuffer("sample rate must be positive".into()));
        }

        let frames = channels[0].len();
        if let Some((index, ch)) = channels.iter().enumerate().find(|(_, c)| c.len() != frames) {
            return Err(Error::InvalidBuffer(format!(
                "channel {index} has {} frames, expected {frames}",
                ch.len()
            )));
        }

        Ok(Self {
            id: BufferId(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed)),
            channels,
            sample_rate,
            frames,
        })
    }

    /// Build from interleaved samples `[c0, c1, ..., c0, c1, ...]`.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidBuffer("buffer has no channels".into()));
        }

        let frames = samples.len() / channels;
        let mut planar = vec![Vec::with_capacity(frames); channels];
        for frame in samples.chunks_exact(channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                planar[ch].push(sample);
            }
        }

        Self::new(planar, sample_rate)
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn duration(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    /// Channel data, or `None` past the last channel.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Sample at `(channel, frame)`, reading 0 outside the buffer.
    #[inline]
    pub fn sample(&self, channel: usize, frame: usize) -> f32 {
        self.channels
            .get(channel)
            .and_then(|c| c.get(frame))
            .copied()
            .unwrap_or(0.0)
    }

    /// Frame index containing time `t`.
    #[inline]
    pub fn frame_at(&self, t: f64) -> usize {
        (t.max(0.0) * self.sample_rate as f64).floor() as usize
    }

    pub fn input_format(&self) -> InputFormat {
        InputFormat {
            channels: self.num_channels().min(2) as u16,
            sample_rate: self.sample_rate,
            bitrate_kbps: None,
        }
    }
}

/// What the export side knows about the source: channels (at most 2),
/// rate, and a bitrate when the container reported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bitrate_kbps: Option<u32>,
}
