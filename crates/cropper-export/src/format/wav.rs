//! WAV format encoder using hound
//!
//! 16-bit integer PCM. Samples are buffered and the whole file is written on
//! flush, since the RIFF header carries the data length.

use crate::encoder::{interleave, BlockEncoder, EncodeSpec, EncoderFactory};
use crate::error::{ExportError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

fn create_wav_spec(spec: &EncodeSpec) -> WavSpec {
    WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoderFactory;

impl EncoderFactory for WavEncoderFactory {
    fn create(&self, spec: EncodeSpec) -> Result<Box<dyn BlockEncoder>> {
        if spec.channels == 0 {
            return Err(ExportError::InvalidOptions("WAV needs at least one channel".into()));
        }
        Ok(Box::new(WavEncoder {
            spec: create_wav_spec(&spec),
            samples: Vec::new(),
        }))
    }

    fn extension(&self) -> &'static str {
        "wav"
    }

    fn mime(&self) -> &'static str {
        "audio/wav"
    }
}

pub struct WavEncoder {
    spec: WavSpec,
    samples: Vec<i16>,
}

impl BlockEncoder for WavEncoder {
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
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, self.spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        self.samples.clear();
        Ok(cursor.into_inner())
    }
}
