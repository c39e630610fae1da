//! Editing model for the cropper clip editor.
//!
//! # Primary API
//!
//! - [`DecodedBuffer`]: immutable planar PCM, the time base for everything else
//! - [`TimeMapper`]: pixel/time conversion for the waveform view
//! - [`RegionModel`]: the clip set, its ordering and clamped mutations
//! - [`DragMachine`]: pointer events to clip gestures
//! - [`PlaybackSessionManager`]: one audible session at a time, stale completions ignored
//!
//! # Example
//!
//! ```ignore
//! use cropper_core::prelude::*;
//!
//! let buffer = Arc::new(DecodedBuffer::from_interleaved(&pcm, 2, 44100)?);
//! let mut regions = RegionModel::new(EditorConfig::default());
//! regions.reset(buffer.duration());
//!
//! let id = regions.create_clip(2.0, 4.5).unwrap();
//! assert_eq!(regions.clip_number(id), Some(1));
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{EditorConfig, DEFAULT_PALETTE};

mod blob;
pub use blob::{EncodedBlob, NamedBlob};

pub mod buffer;
pub use buffer::{BufferId, DecodedBuffer, InputFormat};

pub mod mapper;
pub use mapper::{pixel_to_time, time_to_pixel, TimeMapper};

pub mod region;
pub use region::{compare_clips, order_clips, Clip, ClipId, Color, RegionModel};

pub mod clock;
pub use clock::{ManualClock, SystemClock, TransportClock};

pub mod session;
pub use session::{
    CompletionToken, NullBackend, PlaybackBackend, PlaybackRequest, PlaybackSessionManager,
    SessionId,
};

pub mod drag;
pub use drag::{Cursor, DragMachine, DragOp, GestureOutcome, HitKind, HitTarget};

pub use std::sync::Arc;

pub mod prelude {
    pub use crate::{
        Arc, Clip, ClipId, Color, Cursor, DecodedBuffer, DragMachine, EditorConfig,
        GestureOutcome, PlaybackBackend, PlaybackSessionManager, RegionModel, TimeMapper,
        TransportClock,
    };
}
