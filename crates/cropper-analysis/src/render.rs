//! Waveform and overlay renderer.
//!
//! [`render`] is a pure function of the scene: it clears the canvas and
//! redraws everything, so calling it twice with the same scene produces the
//! same commands. Canvas coordinates are device pixels; the scene's `dpr`
//! converts from the CSS pixels the rest of the editor works in.

use crate::waveform::WaveformSummary;
use cropper_core::{Color, RegionModel, TimeMapper};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Drawing surface in device pixels.
pub trait Canvas {
    fn size(&self) -> (u32, u32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// One-pixel-wide line at `x` from `y1` to `y2`.
    fn vertical_line(&mut self, x: f64, y1: f64, y2: f64, color: Color);
    /// `y` is the text baseline.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font_px: f64, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    Line {
        x: f64,
        y1: f64,
        y2: f64,
        color: Color,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font_px: f64,
        color: Color,
    },
}

/// Canvas that records what was drawn. Hosts replay it onto their own surface.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn rects_with(&self, color: Color) -> impl Iterator<Item = &Rect> {
        self.commands.iter().filter_map(move |c| match c {
            DrawCommand::FillRect { rect, color: c } if *c == color => Some(rect),
            _ => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

impl Canvas for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn vertical_line(&mut self, x: f64, y1: f64, y2: f64, color: Color) {
        self.commands.push(DrawCommand::Line { x, y1, y2, color });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font_px: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            font_px,
            color,
        });
    }
}

/// Colors and CSS-pixel metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub background: Color,
    pub waveform: Color,
    pub label: Color,
    pub label_font_px: f64,
    /// Gap between a clip's left edge and its label.
    pub label_inset_px: f64,
    /// Labels never start closer than this to the right edge.
    pub label_right_margin_px: f64,
    pub label_baseline_px: f64,
    pub boundary_px: f64,
    /// Alpha applied to a clip's color for its fill.
    pub fill_alpha: u8,
    pub playhead: Color,
    pub playhead_px: f64,
    pub create_overlay: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x0a, 0x0a, 0x0a),
            // 0.9 opacity
            waveform: Color::rgba(0x6b, 0x72, 0x80, 0xe6),
            label: Color::rgb(0xe5, 0xe7, 0xeb),
            label_font_px: 12.0,
            label_inset_px: 6.0,
            label_right_margin_px: 60.0,
            label_baseline_px: 16.0,
            boundary_px: 2.0,
            fill_alpha: 0x33,
            playhead: Color::rgb(0xf5, 0x9e, 0x0b),
            playhead_px: 1.0,
            create_overlay: Color::rgb(0x60, 0xa5, 0xfa),
        }
    }
}

/// Everything one frame depends on.
pub struct Scene<'a> {
    /// `None` when nothing is loaded; only the background is drawn.
    pub duration: Option<f64>,
    /// Column envelope with one block per device pixel.
    pub envelope: Option<&'a WaveformSummary>,
    pub regions: &'a RegionModel,
    /// Uncommitted creation span.
    pub pending: Option<(f64, f64)>,
    pub playhead: f64,
    pub dpr: f64,
}

/// `Clip 03 (2.50s)`
pub fn clip_label(number: usize, duration: f64) -> String {
    format!("Clip {number:02} ({duration:.2}s)")
}

pub fn render(scene: &Scene<'_>, style: &RenderStyle, canvas: &mut dyn Canvas) {
    let (w, h) = canvas.size();
    let (w, h) = (w as f64, h as f64);
    let dpr = if scene.dpr.is_finite() && scene.dpr > 0.0 {
        scene.dpr
    } else {
        1.0
    };

    canvas.fill_rect(Rect::new(0.0, 0.0, w, h), style.background);

    let Some(duration) = scene.duration else {
        return;
    };
    let mapper = TimeMapper::new(w / dpr, Some(duration));
    let to_device = |t: f64| mapper.time_to_pixel(t) * dpr;

    if let Some(envelope) = scene.envelope {
        draw_envelope(envelope, style, w, h, canvas);
    }

    let boundary = style.boundary_px * dpr;
    for clip in scene.regions.clips() {
        let x1 = to_device(clip.start).floor();
        let x2 = to_device(clip.end).ceil();
        draw_region(x1, x2, h, boundary, clip.color, style.fill_alpha, canvas);

        let number = scene
            .regions
            .clip_number(clip.id)
            .unwrap_or(clip.id.0 as usize);
        let tx = (x1 + style.label_inset_px * dpr).min(w - style.label_right_margin_px * dpr);
        canvas.fill_text(
            &clip_label(number, clip.duration()),
            tx,
            style.label_baseline_px * dpr,
            style.label_font_px * dpr,
            style.label,
        );
    }

    let px = to_device(scene.playhead.clamp(0.0, duration)).floor();
    canvas.fill_rect(
        Rect::new(px, 0.0, style.playhead_px * dpr, h),
        style.playhead,
    );

    if let Some((start, end)) = scene.pending {
        let x1 = to_device(start.min(end)).floor();
        let x2 = to_device(start.max(end)).ceil();
        draw_region(
            x1,
            x2,
            h,
            boundary,
            style.create_overlay,
            style.fill_alpha,
            canvas,
        );
    }
}

fn draw_envelope(
    envelope: &WaveformSummary,
    style: &RenderStyle,
    w: f64,
    h: f64,
    canvas: &mut dyn Canvas,
) {
    let half = h / 2.0;
    for (x, block) in envelope.blocks.iter().enumerate() {
        let x = x as f64;
        if x >= w {
            break;
        }
        let y1 = (block.min as f64 * half).floor() + half;
        let y2 = (block.max as f64 * half).ceil() + half;
        if y2 > y1 {
            canvas.vertical_line(x + 0.5, y1, y2, style.waveform);
        }
    }
}

fn draw_region(
    x1: f64,
    x2: f64,
    h: f64,
    boundary: f64,
    color: Color,
    fill_alpha: u8,
    canvas: &mut dyn Canvas,
) {
    let width = (x2 - x1).max(1.0);
    canvas.fill_rect(Rect::new(x1, 0.0, width, h), color.with_alpha(fill_alpha));
    canvas.fill_rect(Rect::new(x1, 0.0, boundary, h), color);
    canvas.fill_rect(Rect::new(x2 - boundary, 0.0, boundary, h), color);
}
