//! Editor policy configuration.

use crate::region::Color;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Clip colors, assigned by cycling through the current clip count.
pub const DEFAULT_PALETTE: [Color; 7] = [
    Color::rgb(0x60, 0xa5, 0xfa),
    Color::rgb(0x34, 0xd3, 0x99),
    Color::rgb(0xf4, 0x72, 0xb6),
    Color::rgb(0xf5, 0x9e, 0x0b),
    Color::rgb(0xa7, 0x8b, 0xfa),
    Color::rgb(0x22, 0xd3, 0xee),
    Color::rgb(0xfb, 0x71, 0x85),
];

/// Timing and geometry policy for editing and playback.
///
/// All times are seconds, `edge_tolerance_px` is in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whole-file playback restarts from zero when the offset is this close to the end.
    pub rewind_epsilon: f64,
    /// Clip playback shorter than this is skipped.
    pub min_play_duration: f64,
    /// Pointer displacement that turns a click into a drag.
    pub drag_threshold: f64,
    /// Narrower creations are discarded.
    pub min_clip_width: f64,
    /// Resizing never brings the two edges closer than this.
    pub min_resize_gap: f64,
    pub edge_tolerance_px: f64,
    pub palette: Vec<Color>,
    /// How long a blocked-download notice stays up.
    pub notice_secs: f64,
    /// Views at least this wide (CSS px) get the full duration markers.
    pub wide_layout_px: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            rewind_epsilon: 0.005,
            min_play_duration: 0.01,
            drag_threshold: 0.02,
            min_clip_width: 0.05,
            min_resize_gap: 0.01,
            edge_tolerance_px: 6.0,
            palette: DEFAULT_PALETTE.to_vec(),
            notice_secs: 8.0,
            wide_layout_px: 768.0,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("rewind_epsilon", self.rewind_epsilon),
            ("min_play_duration", self.min_play_duration),
            ("drag_threshold", self.drag_threshold),
            ("min_clip_width", self.min_clip_width),
            ("min_resize_gap", self.min_resize_gap),
            ("edge_tolerance_px", self.edge_tolerance_px),
            ("notice_secs", self.notice_secs),
            ("wide_layout_px", self.wide_layout_px),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if self.min_resize_gap <= 0.0 {
            return Err(Error::InvalidConfig(
                "min_resize_gap must be positive so clips keep start < end".into(),
            ));
        }

        if self.min_clip_width < self.min_resize_gap {
            return Err(Error::InvalidConfig(format!(
                "min_clip_width {} is below min_resize_gap {}",
                self.min_clip_width, self.min_resize_gap
            )));
        }

        if self.palette.is_empty() {
            return Err(Error::InvalidConfig("palette must not be empty".into()));
        }

        Ok(())
    }

    /// Palette entry for the clip created when `count` clips already exist.
    pub fn color_for(&self, count: usize) -> Color {
        match self.palette.len() {
            0 => DEFAULT_PALETTE[count % DEFAULT_PALETTE.len()],
            len => self.palette[count % len],
        }
    }
}
