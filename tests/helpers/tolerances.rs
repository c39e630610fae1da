//! Tolerance constants for editor tests.

/// Exact arithmetic on seconds (mapping, clamping).
pub const TIME_EPSILON: f64 = 1e-9;

/// One millisecond, the resolution of exported file names.
pub const MILLIS_EPSILON: f64 = 1e-3;

/// 16-bit quantization step size.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;
