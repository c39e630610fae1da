//! Error types.

use thiserror::Error;

/// Error type.
#[derive(Error, Debug)]
pub enum MediaError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Container or codec rejected the input.
    #[error("Decode error: {0}")]
    Decode(String),

    /// No decoder for this container or codec.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Container holds no decodable audio track.
    #[error("No audio track found")]
    NoAudioTrack,

    /// Decoded data did not form a valid buffer.
    #[error(transparent)]
    Core(#[from] cropper_core::Error),

    /// Audio device error.
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Background worker died.
    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Result type.
pub type Result<T> = std::result::Result<T, MediaError>;

impl From<symphonia::core::errors::Error> for MediaError {
    fn from(e: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error as E;
        match e {
            E::IoError(io) => MediaError::Io(io),
            E::Unsupported(what) => MediaError::UnsupportedFormat(what.to_string()),
            other => MediaError::Decode(other.to_string()),
        }
    }
}

#[cfg(feature = "cpal-output")]
mod device_errors {
    use super::MediaError;

    macro_rules! device_error {
        ($($ty:ty),* $(,)?) => {
            $(
                impl From<$ty> for MediaError {
                    fn from(e: $ty) -> Self {
                        MediaError::AudioDevice(e.to_string())
                    }
                }
            )*
        };
    }

    device_error!(
        cpal::DevicesError,
        cpal::DefaultStreamConfigError,
        cpal::BuildStreamError,
        cpal::PlayStreamError,
        cpal::StreamError,
    );
}
