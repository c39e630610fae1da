//! # Cropper - Waveform Clip Editor
//!
//! Load a recording, mark clips on its waveform, audition them and export
//! each one (or all of them bundled) as an encoded file.
//!
//! ## Architecture
//!
//! Cropper is an umbrella crate that coordinates:
//! - **cropper-core** - Editing model (buffer, time mapping, clips, drag gestures, playback sessions)
//! - **cropper-analysis** - Waveform envelopes and the overlay renderer
//! - **cropper-export** - Slicing, resampling, encoding, bundling and file naming
//! - **cropper-media** - Container decoding, loading, delivery and audio output
//!
//! ## Quick Start
//!
//! ```ignore
//! use cropper::prelude::*;
//!
//! let mut engine = CropperEngine::builder()
//!     .delivery(DeliveryChain::to_directory("clips"))
//!     .build()?;
//!
//! engine.load_file("podcast.mp3")?;
//! engine.resize(1200.0, 160.0, 2.0);
//!
//! // Drag across the view to mark a clip
//! engine.pointer_down(300.0);
//! engine.pointer_move(540.0);
//! if let GestureOutcome::Created(id) = engine.pointer_up()? {
//!     engine.toggle_clip(id)?;
//!     engine.download_clip(id)?;
//! }
//!
//! // Once per frame
//! for event in engine.poll() {
//!     println!("{event:?}");
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - WAV, FLAC and ZIP
//! - `wav` - WAV encoding
//! - `flac` - FLAC encoding
//! - `zip` - Download-all archives
//! - `cpal-output` - Playback through a CPAL output device
//! - `serialization` - Serde derives on waveform summaries

mod error;
pub use error::{Error, Result};

/// Re-export of cropper-core for direct access
pub use cropper_core as core;

pub use cropper_core::{
    Arc, Clip, ClipId, Color, Cursor, DecodedBuffer, DragMachine, DragOp, EditorConfig,
    EncodedBlob, GestureOutcome, InputFormat, ManualClock, NamedBlob, NullBackend,
    PlaybackBackend, PlaybackRequest, PlaybackSessionManager, RegionModel, SystemClock,
    TimeMapper, TransportClock,
};

// Waveform and drawing
pub use cropper_analysis as analysis;

pub use cropper_analysis::{Canvas, DisplayList, DrawCommand, Rect, RenderStyle, WaveformSummary};

// Export
pub use cropper_export as export;

pub use cropper_export::{
    ArchiveBuilder, EncoderFactory, ExportConfig, ExportError, ExportPipeline, ResampleQuality,
};

// Decoding and delivery
pub use cropper_media as media;

pub use cropper_media::{
    ContainerDecoder, DeliveryChain, DeliveryOutcome, LoadSource, MediaError, SymphoniaDecoder,
    BLOCKED_NOTICE,
};

#[cfg(feature = "cpal-output")]
pub use cropper_media::CpalBackend;

mod builder;
mod engine;

pub use builder::CropperEngineBuilder;
pub use engine::{
    ClipRow, CropperEngine, EngineEvent, DOWNLOAD_ALL_LABEL, DOWNLOAD_LABEL, NO_CLIPS_LABEL,
    PAUSE_LABEL, PLAY_LABEL, PREPARING_LABEL,
};

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{ClipRow, CropperEngine, CropperEngineBuilder, EngineEvent};

    // Editing model
    pub use crate::core::{Clip, ClipId, Cursor, EditorConfig, GestureOutcome};

    // Drawing
    pub use crate::analysis::{Canvas, DisplayList, RenderStyle};

    // Export and delivery
    pub use crate::export::ExportConfig;
    pub use crate::media::{DeliveryChain, DeliveryOutcome, LoadSource};

    #[cfg(feature = "cpal-output")]
    pub use crate::media::CpalBackend;
}
