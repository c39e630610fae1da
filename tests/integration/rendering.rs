//! Display list output for a loaded file

use crate::helpers::*;
use cropper::prelude::*;
use cropper::RenderStyle;

fn draw(rig: &mut TestRig) -> DisplayList {
    let (w, h) = rig.engine.canvas_size();
    let mut canvas = DisplayList::new(w, h);
    rig.engine.render(&mut canvas);
    canvas
}

#[test]
fn test_unloaded_draws_background_only() {
    let mut rig = test_rig();
    let canvas = draw(&mut rig);
    assert_eq!(canvas.commands().len(), 1);
}

#[test]
fn test_waveform_and_labels() {
    let mut rig = test_rig().with_song();
    rig.drag_clip(600.0, 800.0);
    rig.drag_clip(200.0, 450.0);

    let canvas = draw(&mut rig);
    assert!(canvas.line_count() > 900);
    let labels: Vec<&str> = canvas.texts().collect();
    assert!(labels.contains(&"Clip 01 (2.50s)"));
    assert!(labels.contains(&"Clip 02 (2.00s)"));
}

#[test]
fn test_redraw_tracking() {
    let mut rig = test_rig().with_song();
    assert!(rig.engine.needs_redraw());
    draw(&mut rig);
    assert!(!rig.engine.needs_redraw());

    // Uncommitted creation keeps the overlay animating
    rig.engine.pointer_down(200.0);
    rig.engine.pointer_move(300.0);
    draw(&mut rig);
    assert!(rig.engine.needs_redraw());
    rig.engine.pointer_up().unwrap();
    rig.engine.stop();
    draw(&mut rig);
    assert!(!rig.engine.needs_redraw());

    rig.engine.toggle_play_pause().unwrap();
    draw(&mut rig);
    assert!(rig.engine.needs_redraw());
}

#[test]
fn test_playhead_scales_with_device_pixels() {
    let mut rig = test_rig().with_song();
    rig.engine.resize(1000.0, 100.0, 2.0);
    assert_eq!(rig.engine.canvas_size(), (2000, 200));

    rig.click(500.0);
    let canvas = draw(&mut rig);
    let style = RenderStyle::default();
    let playhead: Vec<_> = canvas.rects_with(style.playhead).collect();
    assert_eq!(playhead.len(), 1);
    assert_eq!(playhead[0].x, 1000.0);
    assert_eq!(playhead[0].width, 2.0);
}

#[test]
fn test_pending_overlay_not_committed() {
    let mut rig = test_rig().with_song();
    rig.engine.pointer_down(200.0);
    rig.engine.pointer_move(500.0);

    let canvas = draw(&mut rig);
    let style = RenderStyle::default();
    let bars: Vec<_> = canvas.rects_with(style.create_overlay).collect();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].x, 200.0);
    assert_eq!(canvas.rects_with(style.create_overlay.with_alpha(style.fill_alpha)).count(), 1);
    assert!(rig.engine.regions().is_empty());
}
