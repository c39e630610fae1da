//! Hit-testing and the pointer gesture state machine.

use crate::config::EditorConfig;
use crate::mapper::TimeMapper;
use crate::region::{ClipId, RegionModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Left,
    Right,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTarget {
    pub kind: HitKind,
    pub clip: ClipId,
}

/// Pointer feedback for the waveform view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Crosshair,
    Grab,
    ResizeHorizontal,
}

impl Cursor {
    pub fn css_name(&self) -> &'static str {
        match self {
            Cursor::Crosshair => "crosshair",
            Cursor::Grab => "grab",
            Cursor::ResizeHorizontal => "ew-resize",
        }
    }

    fn for_hover(hover: Option<HitTarget>) -> Self {
        match hover.map(|h| h.kind) {
            None => Cursor::Crosshair,
            Some(HitKind::Move) => Cursor::Grab,
            Some(HitKind::Left | HitKind::Right) => Cursor::ResizeHorizontal,
        }
    }
}

/// First clip (storage order) under `x`. Edges win over the interior.
pub fn hit_test(
    x: f64,
    mapper: &TimeMapper,
    regions: &RegionModel,
    edge_px: f64,
) -> Option<HitTarget> {
    for clip in regions.clips() {
        let x1 = mapper.time_to_pixel(clip.start);
        let x2 = mapper.time_to_pixel(clip.end);
        let kind = if (x - x1).abs() <= edge_px {
            HitKind::Left
        } else if (x - x2).abs() <= edge_px {
            HitKind::Right
        } else if x > x1 && x < x2 {
            HitKind::Move
        } else {
            continue;
        };
        return Some(HitTarget {
            kind,
            clip: clip.id,
        });
    }
    None
}

/// In-flight gesture. Times are seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragOp {
    #[default]
    Idle,
    /// Pressed on empty space, not yet moved far enough to count as a drag.
    MaybeCreate { anchor: f64, current: f64 },
    Create { anchor: f64, current: f64 },
    /// Pressed inside a clip, not yet moved far enough to count as a drag.
    MaybeMove {
        clip: ClipId,
        anchor: f64,
        current: f64,
        grab_offset: f64,
    },
    Move {
        clip: ClipId,
        grab_offset: f64,
        origin_start: f64,
        origin_end: f64,
    },
    ResizeLeft { clip: ClipId },
    ResizeRight { clip: ClipId },
}

/// What a finished gesture asks of the rest of the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Nothing to do (no gesture, or a creation too narrow to keep).
    None,
    Created(ClipId),
    /// A click: seek there and start whole-file playback.
    Seek(f64),
    /// A move or resize finished. The model was already mutated live.
    Edited(ClipId),
}

pub struct DragMachine {
    op: DragOp,
    hover: Option<HitTarget>,
    cursor: Cursor,
    drag_threshold: f64,
    edge_px: f64,
}

impl DragMachine {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            op: DragOp::Idle,
            hover: None,
            cursor: Cursor::Crosshair,
            drag_threshold: config.drag_threshold,
            edge_px: config.edge_tolerance_px,
        }
    }

    pub fn op(&self) -> &DragOp {
        &self.op
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.op, DragOp::Idle)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn hover(&self) -> Option<HitTarget> {
        self.hover
    }

    /// Uncommitted creation span `(start, end)`, for the transient overlay.
    pub fn pending_creation(&self) -> Option<(f64, f64)> {
        match self.op {
            DragOp::Create { anchor, current } => Some((anchor.min(current), anchor.max(current))),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, x: f64, mapper: &TimeMapper, regions: &RegionModel) -> Cursor {
        let t = mapper.pixel_to_time(x);
        let hit = hit_test(x, mapper, regions, self.edge_px)
            .and_then(|hit| regions.get(hit.clip).map(|clip| (hit, clip.start)));

        self.op = match hit {
            None => {
                self.cursor = Cursor::Crosshair;
                DragOp::MaybeCreate {
                    anchor: t,
                    current: t,
                }
            }
            Some((hit, clip_start)) => {
                self.cursor = Cursor::Grab;
                match hit.kind {
                    HitKind::Move => DragOp::MaybeMove {
                        clip: hit.clip,
                        anchor: t,
                        current: t,
                        grab_offset: t - clip_start,
                    },
                    HitKind::Left => DragOp::ResizeLeft { clip: hit.clip },
                    HitKind::Right => DragOp::ResizeRight { clip: hit.clip },
                }
            }
        };
        self.cursor
    }

    /// Returns `true` when the model or the creation overlay changed.
    pub fn pointer_move(&mut self, x: f64, mapper: &TimeMapper, regions: &mut RegionModel) -> bool {
        if !self.is_active() {
            self.hover = hit_test(x, mapper, regions, self.edge_px);
            self.cursor = Cursor::for_hover(self.hover);
            return false;
        }

        let t = mapper.pixel_to_time(mapper.clamp_x(x));
        let threshold = self.drag_threshold;

        match &mut self.op {
            DragOp::Idle => false,
            DragOp::Create { current, .. } => {
                *current = t;
                true
            }
            DragOp::MaybeCreate { anchor, current } => {
                *current = t;
                if (t - *anchor).abs() >= threshold {
                    let anchor = *anchor;
                    self.op = DragOp::Create { anchor, current: t };
                }
                true
            }
            DragOp::MaybeMove {
                clip,
                anchor,
                current,
                grab_offset,
            } => {
                *current = t;
                if (t - *anchor).abs() < threshold {
                    return false;
                }
                let (id, grab_offset) = (*clip, *grab_offset);
                let Some(origin) = regions.get(id).copied() else {
                    return false;
                };
                self.op = DragOp::Move {
                    clip: id,
                    grab_offset,
                    origin_start: origin.start,
                    origin_end: origin.end,
                };
                regions.move_clip(id, t - grab_offset)
            }
            DragOp::Move {
                clip, grab_offset, ..
            } => regions.move_clip(*clip, t - *grab_offset),
            DragOp::ResizeLeft { clip } => regions.resize_left(*clip, t),
            DragOp::ResizeRight { clip } => regions.resize_right(*clip, t),
        }
    }

    /// Finish the gesture. Drag and hover state are always cleared.
    pub fn pointer_up(&mut self, regions: &mut RegionModel) -> GestureOutcome {
        let op = std::mem::take(&mut self.op);
        self.hover = None;
        self.cursor = Cursor::Crosshair;

        match op {
            DragOp::Idle => GestureOutcome::None,
            DragOp::Create { anchor, current } => match regions.create_clip(anchor, current) {
                Some(id) => GestureOutcome::Created(id),
                None => GestureOutcome::None,
            },
            DragOp::MaybeCreate { anchor, current } => GestureOutcome::Seek(anchor.min(current)),
            DragOp::MaybeMove {
                anchor, current, ..
            } => GestureOutcome::Seek(anchor.min(current)),
            DragOp::Move { clip, .. }
            | DragOp::ResizeLeft { clip }
            | DragOp::ResizeRight { clip } => GestureOutcome::Edited(clip),
        }
    }

    /// Abandon the gesture. A pending creation is dropped and a move snaps
    /// back to where it started; resizes already applied stay applied.
    pub fn cancel(&mut self, regions: &mut RegionModel) {
        if let DragOp::Move {
            clip, origin_start, ..
        } = std::mem::take(&mut self.op)
        {
            regions.move_clip(clip, origin_start);
        }
        self.hover = None;
        self.cursor = Cursor::Crosshair;
    }
}
