//! Error types for cropper-core.

use thiserror::Error;

/// Error type for cropper-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("No media loaded")]
    NoMedia,

    #[error("Unknown clip: {0}")]
    UnknownClip(u64),

    #[error("Playback backend error: {0}")]
    Backend(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
