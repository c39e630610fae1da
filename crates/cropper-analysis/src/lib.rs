//! # Cropper Analysis
//!
//! Waveform envelopes and the overlay renderer for the clip editor.
//!
//! - **Envelope**: per-column min/max of the averaged first two channels
//! - **Cache**: envelopes keyed by buffer and view width
//! - **Render**: background, envelope, clip overlays, creation overlay and playhead,
//!   drawn onto any [`Canvas`]
//!
//! ```ignore
//! use cropper_analysis::{render, DisplayList, RenderStyle, Scene};
//!
//! let mut canvas = DisplayList::new(1600, 240);
//! render(&scene, &RenderStyle::default(), &mut canvas);
//! ```

pub mod cache;
pub mod render;
pub mod waveform;

pub use cache::EnvelopeCache;
pub use render::{clip_label, render, Canvas, DisplayList, DrawCommand, Rect, RenderStyle, Scene};
pub use waveform::{column_summary, WaveformBlock, WaveformSummary};
