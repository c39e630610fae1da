//! Drag gestures, clip numbering and list labels

use crate::helpers::tolerances::TIME_EPSILON;
use crate::helpers::*;
use approx::assert_relative_eq;
use cropper::prelude::*;
use cropper::NO_CLIPS_LABEL;

#[test]
fn test_drag_creates_clip() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 450.0);

    let clip = *rig.engine.regions().get(id).unwrap();
    assert_relative_eq!(clip.start, 2.0, epsilon = TIME_EPSILON);
    assert_relative_eq!(clip.end, 4.5, epsilon = TIME_EPSILON);
    assert_eq!(rig.engine.regions().len(), 1);
}

#[test]
fn test_backwards_drag_normalizes() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(600.0, 300.0);

    let clip = rig.engine.regions().get(id).unwrap();
    assert_relative_eq!(clip.start, 3.0, epsilon = TIME_EPSILON);
    assert_relative_eq!(clip.end, 6.0, epsilon = TIME_EPSILON);
}

#[test]
fn test_narrow_drag_creates_nothing() {
    let mut rig = test_rig().with_song();
    // 40 ms: past the drag threshold, below the minimum clip width
    rig.engine.pointer_down(100.0);
    rig.engine.pointer_move(104.0);
    let outcome = rig.engine.pointer_up().unwrap();

    assert_eq!(outcome, GestureOutcome::None);
    assert!(rig.engine.regions().is_empty());
}

#[test]
fn test_click_seeks_and_plays() {
    let mut rig = test_rig().with_song();
    let outcome = rig.click(730.0);

    match outcome {
        GestureOutcome::Seek(t) => assert_relative_eq!(t, 7.3, epsilon = TIME_EPSILON),
        other => panic!("expected seek, got {other:?}"),
    }
    assert!(rig.engine.is_playing());
    assert!(rig.engine.regions().is_empty());
    let start = rig.backend.last_start().unwrap();
    assert_relative_eq!(start.offset, 7.3, epsilon = TIME_EPSILON);
    assert_eq!(start.duration, None);
}

#[test]
fn test_jitter_inside_clip_does_not_move_it() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 400.0);

    rig.engine.pointer_down(300.0);
    rig.engine.pointer_move(301.0);
    let outcome = rig.engine.pointer_up().unwrap();

    assert!(matches!(outcome, GestureOutcome::Seek(_)));
    let clip = rig.engine.regions().get(id).unwrap();
    assert_relative_eq!(clip.start, 2.0, epsilon = TIME_EPSILON);
    assert_relative_eq!(clip.end, 4.0, epsilon = TIME_EPSILON);
}

#[test]
fn test_move_clamps_to_media() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 400.0);

    rig.engine.pointer_down(300.0);
    rig.engine.pointer_move(1400.0);
    assert_eq!(rig.engine.pointer_up().unwrap(), GestureOutcome::Edited(id));

    let clip = rig.engine.regions().get(id).unwrap();
    assert_relative_eq!(clip.end, 10.0, epsilon = TIME_EPSILON);
    assert_relative_eq!(clip.duration(), 2.0, epsilon = TIME_EPSILON);
}

#[test]
fn test_resize_keeps_minimum_gap() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 400.0);

    rig.engine.pointer_down(399.0);
    rig.engine.pointer_move(50.0);
    rig.engine.pointer_up().unwrap();

    let clip = rig.engine.regions().get(id).unwrap();
    assert_relative_eq!(clip.start, 2.0, epsilon = TIME_EPSILON);
    assert_relative_eq!(clip.end, 2.01, epsilon = TIME_EPSILON);
}

#[test]
fn test_cancel_restores_moved_clip() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 400.0);

    rig.engine.pointer_down(300.0);
    rig.engine.pointer_move(700.0);
    rig.engine.pointer_cancel();

    let clip = rig.engine.regions().get(id).unwrap();
    assert_relative_eq!(clip.start, 2.0, epsilon = TIME_EPSILON);
    assert!(!rig.engine.drag().is_active());
}

#[test]
fn test_rows_follow_position_not_creation() {
    let mut rig = test_rig().with_song();
    let late = rig.drag_clip(600.0, 800.0);
    let early = rig.drag_clip(100.0, 300.0);

    let rows = rig.engine.clip_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, early);
    assert_eq!(rows[0].title, "Clip 01");
    assert_eq!(rows[1].id, late);
    assert_eq!(rows[1].title, "Clip 02");

    rig.engine.delete_clip(early);
    let rows = rig.engine.clip_rows();
    assert_eq!(rows[0].id, late);
    assert_eq!(rows[0].number, 1);
}

#[test]
fn test_row_text() {
    let mut rig = test_rig().with_song();
    rig.drag_clip(200.0, 450.0);

    let row = &rig.engine.clip_rows()[0];
    assert_eq!(row.span, "(00:00:02:00 – 00:00:04:50)");
    assert_eq!(row.markers, ":");
    assert_eq!(row.length, "2.50s");
    assert_eq!(row.detail(), "(00:00:02:00 – 00:00:04:50) : 2.50s");
    assert_eq!(row.play_label, "Play");
    assert_eq!(row.download_label, "Download");
    assert!(row.download_enabled);
}

#[test]
fn test_colors_cycle_palette() {
    let mut rig = test_rig().with_song();
    let palette = rig.engine.config().palette.clone();
    for i in 0..=palette.len() {
        let x = 10.0 + i as f64 * 100.0;
        rig.drag_clip(x, x + 50.0);
    }
    let clips = rig.engine.regions().clips();
    assert_eq!(clips[0].color, palette[0]);
    assert_eq!(clips[1].color, palette[1]);
    assert_eq!(clips[palette.len()].color, palette[0]);
}

#[test]
fn test_placeholder_and_duration_label() {
    let mut rig = test_rig();
    assert_eq!(rig.engine.duration_label(), None);
    assert_eq!(rig.engine.clip_list_placeholder(), Some(NO_CLIPS_LABEL));

    rig.load_song(10.0);
    assert_eq!(rig.engine.duration_label().as_deref(), Some("Duration: 10.00s"));

    rig.drag_clip(100.0, 300.0);
    assert_eq!(rig.engine.clip_list_placeholder(), None);

    rig.engine.clear_clips();
    assert_eq!(rig.engine.clip_list_placeholder(), Some("No clips yet."));
}

#[test]
fn test_pointer_ignored_without_media() {
    let mut rig = test_rig();
    rig.engine.pointer_down(100.0);
    rig.engine.pointer_move(500.0);
    assert_eq!(rig.engine.pointer_up().unwrap(), GestureOutcome::None);
    assert!(rig.engine.regions().is_empty());
    assert!(rig.backend.starts().is_empty());
}
