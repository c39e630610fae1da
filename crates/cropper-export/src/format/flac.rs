//! FLAC format encoder using flacenc
//!
//! Lossless 16-bit stream. flacenc encodes from a complete in-memory source,
//! so blocks are collected and the stream is produced on flush.

use crate::encoder::{interleave, BlockEncoder, EncodeSpec, EncoderFactory};
use crate::error::{ExportError, Result};
use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config::Encoder as EncoderConfig;
use flacenc::encode_with_fixed_block_size;
use flacenc::error::Verify;
use flacenc::source::MemSource;

/// FLAC encoder factory
#[derive(Debug, Clone, Copy)]
pub struct FlacEncoderFactory {
    /// Block size (samples per FLAC frame, affects compression efficiency)
    pub block_size: usize,
}

impl Default for FlacEncoderFactory {
    fn default() -> Self {
        Self { block_size: 4096 }
    }
}

impl EncoderFactory for FlacEncoderFactory {
    fn create(&self, spec: EncodeSpec) -> Result<Box<dyn BlockEncoder>> {
        if !(1..=8).contains(&spec.channels) {
            return Err(ExportError::InvalidOptions(format!(
                "FLAC supports 1 to 8 channels, got {}",
                spec.channels
            )));
        }
        Ok(Box::new(FlacEncoder {
            spec,
            block_size: self.block_size,
            samples: Vec::new(),
        }))
    }

    fn extension(&self) -> &'static str {
        "flac"
    }

    fn mime(&self) -> &'static str {
        "audio/flac"
    }
}

pub struct FlacEncoder {
    spec: EncodeSpec,
    block_size: usize,
    samples: Vec<i16>,
}

impl BlockEncoder for FlacEncoder {
    fn encode_block(&mut self, block: &[&[i16]]) -> Result<Vec<u8>> {
        if block.len() != self.spec.channels as usize {
            return Err(ExportError::InvalidData(format!(
                "expected {} channels, got {}",
                self.spec.channels,
                block.len()
            )));
        }
        interleave(block, &mut self.samples);
        Ok(Vec::new())
    }

    fn flush(&mut self) -> Result<Vec<u8>> {
        let interleaved: Vec<i32> = self.samples.drain(..).map(i32::from).collect();

        let encoder_config = EncoderConfig::default()
            .into_verified()
            .map_err(|e| ExportError::Encoding(format!("Invalid FLAC config: {:?}", e)))?;

        let source = MemSource::from_samples(
            &interleaved,
            self.spec.channels as usize,
            16,
            self.spec.sample_rate as usize,
        );

        let stream = encode_with_fixed_block_size(&encoder_config, source, self.block_size)
            .map_err(|e| ExportError::Encoding(format!("FLAC encoding failed: {:?}", e)))?;

        let mut sink = ByteSink::new();
        stream
            .write(&mut sink)
            .map_err(|e| ExportError::Encoding(format!("Failed to write FLAC stream: {:?}", e)))?;

        Ok(sink.into_inner())
    }
}
