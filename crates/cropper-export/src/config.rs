//! Export configuration.

use crate::dsp::ResampleQuality;
use crate::error::{ExportError, Result};
use crate::rate::DEFAULT_ENCODE_RATES;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Rates the encoder is driven at; the nearest one wins.
    pub supported_rates: Vec<u32>,
    /// Frames handed to the encoder per call.
    pub block_size: usize,
    /// Used when the source does not report a bitrate.
    pub default_bitrate_kbps: u32,
    pub min_bitrate_kbps: u32,
    pub max_bitrate_kbps: u32,
    pub resample_quality: ResampleQuality,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            supported_rates: DEFAULT_ENCODE_RATES.to_vec(),
            block_size: 1152,
            default_bitrate_kbps: 320,
            min_bitrate_kbps: 64,
            max_bitrate_kbps: 320,
            resample_quality: ResampleQuality::default(),
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.supported_rates.is_empty() {
            return Err(ExportError::InvalidOptions(
                "supported_rates must not be empty".into(),
            ));
        }
        if self.supported_rates.contains(&0) {
            return Err(ExportError::InvalidOptions(
                "supported_rates must be non-zero".into(),
            ));
        }
        if self.block_size == 0 {
            return Err(ExportError::InvalidOptions("block_size must be > 0".into()));
        }
        if self.min_bitrate_kbps > self.max_bitrate_kbps {
            return Err(ExportError::InvalidOptions(format!(
                "min_bitrate_kbps {} exceeds max_bitrate_kbps {}",
                self.min_bitrate_kbps, self.max_bitrate_kbps
            )));
        }
        Ok(())
    }

    /// Source bitrate if known, else the default, clamped to the allowed range.
    pub fn bitrate_for(&self, source_kbps: Option<u32>) -> u32 {
        source_kbps
            .unwrap_or(self.default_bitrate_kbps)
            .clamp(self.min_bitrate_kbps, self.max_bitrate_kbps.max(self.min_bitrate_kbps))
    }
}
