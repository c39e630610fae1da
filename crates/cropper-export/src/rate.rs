//! Encoder sample-rate selection.

/// Rates the default encoders are driven at.
pub const DEFAULT_ENCODE_RATES: [u32; 3] = [32_000, 44_100, 48_000];

/// Nearest supported rate by absolute distance; ties go to the earlier entry.
///
/// An empty set leaves the source rate unchanged.
pub fn select_encode_rate(source_rate: u32, supported: &[u32]) -> u32 {
    let mut best: Option<(u32, u32)> = None;
    for &rate in supported {
        let distance = rate.abs_diff(source_rate);
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((rate, distance)),
        }
    }
    best.map(|(rate, _)| rate).unwrap_or(source_rate)
}
