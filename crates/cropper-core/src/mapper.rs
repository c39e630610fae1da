//! Pixel/time conversion for the waveform view.
//!
//! Widths are in CSS pixels. Device-pixel scaling is the renderer's job.

/// Duration used for mapping when nothing is loaded.
pub const UNLOADED_DURATION: f64 = 1.0;

/// Time under pixel `x`, clamped to `[0, duration]`.
#[inline]
pub fn pixel_to_time(x: f64, view_width: f64, duration: f64) -> f64 {
    if view_width <= 0.0 || !x.is_finite() {
        return 0.0;
    }
    ((x / view_width) * duration).clamp(0.0, duration.max(0.0))
}

/// Pixel position of time `t`. Not clamped, so off-view times map off-view.
#[inline]
pub fn time_to_pixel(t: f64, view_width: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    (t / duration) * view_width
}

/// A view width bound to a media duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeMapper {
    pub view_width: f64,
    pub duration: f64,
}

impl TimeMapper {
    pub fn new(view_width: f64, duration: Option<f64>) -> Self {
        Self {
            view_width,
            duration: duration.unwrap_or(UNLOADED_DURATION),
        }
    }

    #[inline]
    pub fn pixel_to_time(&self, x: f64) -> f64 {
        pixel_to_time(x, self.view_width, self.duration)
    }

    #[inline]
    pub fn time_to_pixel(&self, t: f64) -> f64 {
        time_to_pixel(t, self.view_width, self.duration)
    }

    /// Clamp a pointer position into the view.
    #[inline]
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.clamp(0.0, self.view_width.max(0.0))
    }
}
