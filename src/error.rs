//! Centralized error type for the cropper umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cropper_core::Error),

    #[error("Export: {0}")]
    Export(#[from] cropper_export::ExportError),

    #[error("Media: {0}")]
    Media(#[from] cropper_media::MediaError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
