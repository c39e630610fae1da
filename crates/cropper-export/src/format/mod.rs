//! Audio format encoders
//!
//! Each encoder is feature-gated:
//! - `wav`: WAV via hound (pure Rust)
//! - `flac`: FLAC via flacenc (pure Rust)

#[cfg(feature = "wav")]
pub mod wav;

#[cfg(feature = "flac")]
pub mod flac;

use crate::encoder::EncoderFactory;
use crate::error::{ExportError, Result};
use std::sync::Arc;

/// Encoder used when none is configured: FLAC when compiled in, else WAV.
#[allow(unreachable_code)]
pub fn default_encoder() -> Result<Arc<dyn EncoderFactory>> {
    #[cfg(feature = "flac")]
    return Ok(Arc::new(flac::FlacEncoderFactory::default()));
    #[cfg(feature = "wav")]
    return Ok(Arc::new(wav::WavEncoderFactory));
    Err(ExportError::UnsupportedFormat(
        "no encoder enabled; build with the `flac` or `wav` feature".into(),
    ))
}

/// Encoder for a file extension (`wav`, `flac`).
pub fn encoder_for_extension(extension: &str) -> Result<Arc<dyn EncoderFactory>> {
    match extension.to_ascii_lowercase().as_str() {
        #[cfg(feature = "wav")]
        "wav" => Ok(Arc::new(wav::WavEncoderFactory)),
        #[cfg(feature = "flac")]
        "flac" => Ok(Arc::new(flac::FlacEncoderFactory::default())),
        other => Err(ExportError::UnsupportedFormat(format!(
            "Unknown or unsupported extension: {other}"
        ))),
    }
}
