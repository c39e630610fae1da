//! # Cropper Media
//!
//! Everything that touches the outside world:
//!
//! - **Decode**: container bytes to a [`DecodedBuffer`](cropper_core::DecodedBuffer) via Symphonia
//! - **Import**: blocking or background loads from a path or raw bytes
//! - **Delivery**: save, fall back to open, fall back to a notice
//! - **Output** (`cpal-output`): a [`PlaybackBackend`](cropper_core::PlaybackBackend) on a CPAL device

pub mod decode;
pub mod delivery;
pub mod error;
pub mod import;
pub mod voice;

#[cfg(feature = "cpal-output")]
pub mod output;

pub use decode::{ContainerDecoder, DecodedMedia, SymphoniaDecoder};
pub use delivery::{
    DeliveryChain, DeliveryOutcome, DirectorySave, OpenTarget, SaveTarget, SystemOpener,
    BLOCKED_NOTICE,
};
pub use error::{MediaError, Result};
pub use import::{load, LoadHandle, LoadSource, LoadStatus, LoadedMedia};
pub use voice::Voice;

#[cfg(feature = "cpal-output")]
pub use output::CpalBackend;
