//! Encoder seam.
//!
//! The pipeline hands an encoder fixed-size blocks of 16-bit planar PCM and
//! concatenates whatever bytes come back, then appends the flush segment.
//! Encoders that need the whole stream (WAV headers, FLAC stream info) may
//! return nothing per block and emit everything on flush.

use crate::error::Result;

/// Parameters an encoder is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSpec {
    pub channels: u16,
    pub sample_rate: u32,
    /// Advisory for lossy encoders; lossless encoders ignore it.
    pub bitrate_kbps: u32,
}

pub trait BlockEncoder: Send {
    /// `block` holds one slice per channel, all the same length.
    fn encode_block(&mut self, block: &[&[i16]]) -> Result<Vec<u8>>;

    fn flush(&mut self) -> Result<Vec<u8>>;
}

/// Opens encoders for one output format.
pub trait EncoderFactory: Send + Sync {
    fn create(&self, spec: EncodeSpec) -> Result<Box<dyn BlockEncoder>>;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn mime(&self) -> &'static str;
}

/// Interleave planar blocks frame by frame.
pub(crate) fn interleave(block: &[&[i16]], out: &mut Vec<i16>) {
    let frames = block.first().map_or(0, |c| c.len());
    out.reserve(frames * block.len());
    for frame in 0..frames {
        for channel in block {
            out.push(channel.get(frame).copied().unwrap_or(0));
        }
    }
}
