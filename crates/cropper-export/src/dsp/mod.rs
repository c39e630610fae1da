//! DSP utilities for clip export.

mod resample;

pub use resample::{resample, ResampleQuality};
