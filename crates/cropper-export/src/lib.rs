//! # Cropper Export
//!
//! Turns clips of a decoded buffer into encoded files.
//!
//! - **Slicing**: clip bounds to frames, mono downmix or stereo pair
//! - **Rate selection + resampling**: nearest encoder rate, converted with rubato
//! - **Encoding**: 16-bit PCM blocks through an [`EncoderFactory`] (FLAC, WAV)
//! - **Bundling**: several clips into one archive (ZIP)
//! - **Naming**: sanitized `{base}---clip-NN-...` file names and UI time labels
//!
//! ```ignore
//! use cropper_export::{ExportConfig, ExportPipeline};
//!
//! let pipeline = ExportPipeline::with_defaults(ExportConfig::default())?;
//! let named = pipeline.export_clip_named(&buffer, buffer.input_format(), &clip, 1, "song")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `wav` (default): WAV encoding via hound (pure Rust)
//! - `flac` (default): FLAC encoding via flacenc (pure Rust)
//! - `zip` (default): "download all" archives via zip

pub mod error;
mod config;

pub mod archive;
pub mod dsp;
pub mod encoder;
pub mod format;
pub mod handle;
pub mod naming;
pub mod pcm;
pub mod pipeline;
pub mod rate;
pub mod slice;

pub use archive::ArchiveBuilder;
#[cfg(feature = "zip")]
pub use archive::ZipArchiveBuilder;
pub use config::ExportConfig;
pub use dsp::ResampleQuality;
pub use encoder::{BlockEncoder, EncodeSpec, EncoderFactory};
pub use error::{ExportError, Result};
pub use format::{default_encoder, encoder_for_extension};
pub use handle::{ExportHandle, ExportJob, ExportStatus};
pub use naming::{
    archive_filename, base_name, clip_filename, colon_markers, hms_millis, sanitize_base_name,
    ui_time,
};
pub use pipeline::{ExportPipeline, ExportProgress};
pub use rate::{select_encode_rate, DEFAULT_ENCODE_RATES};
pub use slice::{slice_for_export, PcmSlice};

#[cfg(feature = "flac")]
pub use format::flac::FlacEncoderFactory;
#[cfg(feature = "wav")]
pub use format::wav::WavEncoderFactory;
