//! Clip set with positional ordering and clamped mutations.

use crate::config::EditorConfig;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(pub u64);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 8-bit RGBA display color. Serializes as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidConfig(format!("invalid color '{s}'"));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { byte(6)? } else { 0xff };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub id: ClipId,
    pub start: f64,
    pub end: f64,
    pub color: Color,
}

impl Clip {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Display order: start, then end, then id.
pub fn compare_clips(a: &Clip, b: &Clip) -> Ordering {
    a.start
        .total_cmp(&b.start)
        .then(a.end.total_cmp(&b.end))
        .then(a.id.cmp(&b.id))
}

/// Clips in display order.
pub fn order_clips(clips: &[Clip]) -> Vec<&Clip> {
    let mut ordered: Vec<&Clip> = clips.iter().collect();
    ordered.sort_by(|a, b| compare_clips(a, b));
    ordered
}

/// The clips of one loaded file.
///
/// Every committed clip satisfies `0 <= start < end <= duration`. Mutations
/// clamp rather than fail.
#[derive(Debug, Clone)]
pub struct RegionModel {
    clips: Vec<Clip>,
    duration: f64,
    /// Highest id handed out since the last reset.
    high_water: u64,
    config: EditorConfig,
}

impl RegionModel {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            clips: Vec::new(),
            duration: 0.0,
            high_water: 0,
            config,
        }
    }

    /// Forget every clip and adopt a new media duration.
    pub fn reset(&mut self, duration: f64) {
        self.clips.clear();
        self.high_water = 0;
        self.duration = duration.max(0.0);
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Storage (creation) order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    /// Commit a clip spanning the two times in either order.
    ///
    /// Returns `None` when the clamped span is narrower than the minimum
    /// clip width.
    pub fn create_clip(&mut self, a: f64, b: f64) -> Option<ClipId> {
        let start = a.min(b).max(0.0);
        let end = a.max(b).min(self.duration);
        if !(end - start >= self.config.min_clip_width) {
            return None;
        }

        let max_id = self.clips.iter().map(|c| c.id.0).max().unwrap_or(0);
        let id = ClipId(max_id.max(self.high_water) + 1);
        self.high_water = id.0;

        let color = self.config.color_for(self.clips.len());
        self.clips.push(Clip {
            id,
            start,
            end,
            color,
        });
        tracing::debug!("Created clip {id} [{start:.3}, {end:.3}]");
        Some(id)
    }

    pub fn delete_clip(&mut self, id: ClipId) -> Option<Clip> {
        let index = self.clips.iter().position(|c| c.id == id)?;
        Some(self.clips.remove(index))
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }

    /// Slide a clip so it starts at `new_start`, keeping its width and
    /// staying inside `[0, duration]`.
    pub fn move_clip(&mut self, id: ClipId, new_start: f64) -> bool {
        let duration = self.duration;
        let Some(clip) = self.get_mut(id) else {
            return false;
        };
        let width = clip.end - clip.start;
        let start = new_start.min(duration - width).max(0.0);
        clip.start = start;
        clip.end = start + width;
        true
    }

    /// Move the left edge to `t`, clamped to `[0, end - gap]`.
    pub fn resize_left(&mut self, id: ClipId, t: f64) -> bool {
        let gap = self.config.min_resize_gap;
        let Some(clip) = self.get_mut(id) else {
            return false;
        };
        clip.start = t.max(0.0).min(clip.end - gap);
        true
    }

    /// Move the right edge to `t`, clamped to `[start + gap, duration]`.
    pub fn resize_right(&mut self, id: ClipId, t: f64) -> bool {
        let gap = self.config.min_resize_gap;
        let duration = self.duration;
        let Some(clip) = self.get_mut(id) else {
            return false;
        };
        clip.end = t.min(duration).max(clip.start + gap);
        true
    }

    /// Clips sorted by start, end, then id.
    pub fn ordered(&self) -> Vec<&Clip> {
        order_clips(&self.clips)
    }

    /// 1-based position in display order.
    pub fn clip_number(&self, id: ClipId) -> Option<usize> {
        self.ordered()
            .iter()
            .position(|c| c.id == id)
            .map(|index| index + 1)
    }
}
