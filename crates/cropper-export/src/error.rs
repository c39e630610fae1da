//! Error types for cropper-export

use std::io;
use thiserror::Error;

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error while writing an encoded stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Format not compiled in or not accepted by the encoder
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid export configuration
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Encoder rejected the stream
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Resampling error
    #[error("Resampling error: {0}")]
    Resample(String),

    /// Invalid audio data
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// Archive bundling failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Background export thread died
    #[error("Export worker failed: {0}")]
    Worker(String),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(feature = "wav")]
impl From<hound::Error> for ExportError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => ExportError::Io(io),
            other => ExportError::Encoding(other.to_string()),
        }
    }
}

impl From<rubato::ResamplerConstructionError> for ExportError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        ExportError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for ExportError {
    fn from(e: rubato::ResampleError) -> Self {
        ExportError::Resample(e.to_string())
    }
}

#[cfg(feature = "zip")]
impl From<zip::result::ZipError> for ExportError {
    fn from(e: zip::result::ZipError) -> Self {
        ExportError::Archive(e.to_string())
    }
}
