//! File names and time labels for exported clips.

/// Replace characters file systems reject, collapse whitespace runs and trim
/// leading/trailing spaces and dots. Falls back to `audio`.
pub fn sanitize_base_name(name: &str) -> String {
    let mut safe = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                safe.push(' ');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => safe.push('_'),
            _ => safe.push(c),
        }
    }

    let trimmed = safe.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        "audio".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitized file name with its last extension removed. A leading dot is
/// not treated as an extension separator.
pub fn base_name(file_name: Option<&str>) -> String {
    let Some(name) = file_name.filter(|n| !n.is_empty()) else {
        return "audio".to_string();
    };
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    sanitize_base_name(stem)
}

/// Split whole seconds into (hours capped at 99, minutes, seconds).
fn hms(total_secs: u64) -> (u64, u64, u64) {
    let hours = (total_secs / 3600).min(99);
    let minutes = (total_secs % 3600) / 60;
    (hours, minutes, total_secs % 60)
}

fn non_negative(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

/// `HH.MM.SS.mmm`, rounded to the nearest millisecond.
pub fn hms_millis(seconds: f64) -> String {
    let total_ms = (non_negative(seconds) * 1000.0).round() as u64;
    let (h, m, s) = hms(total_ms / 1000);
    format!("{h:02}.{m:02}.{s:02}.{:03}", total_ms % 1000)
}

/// `HH:MM:SS:CC`, truncated to the centisecond.
pub fn ui_time(seconds: f64) -> String {
    let t = non_negative(seconds);
    let whole = t.floor();
    let centi = ((t - whole) * 100.0).floor() as u64;
    let (h, m, s) = hms(whole as u64);
    format!("{h:02}:{m:02}:{s:02}:{centi:02}")
}

/// One `:` per full 15 s of duration, at most 10. Wide layouts show at least
/// one; narrow layouts always show exactly one.
pub fn colon_markers(duration: f64, wide: bool) -> String {
    let full = ((non_negative(duration) / 15.0).floor() as usize).min(10);
    let count = if wide { full.max(1) } else { 1 };
    vec![":"; count].join(" ")
}

/// `{base}---clip-{NN}-{start}-{end}-{duration}.{ext}`
pub fn clip_filename(base: &str, number: usize, start: f64, end: f64, extension: &str) -> String {
    let duration = non_negative(end - start);
    format!(
        "{base}---clip-{number:02}-{}-{}-{duration:.2}.{extension}",
        hms_millis(start),
        hms_millis(end),
    )
}

/// `{base}---clips.{ext}`
pub fn archive_filename(base: &str, extension: &str) -> String {
    format!("{base}---clips.{extension}")
}
