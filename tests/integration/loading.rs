//! Blocking and background loads

use crate::helpers::tolerances::TIME_EPSILON;
use crate::helpers::*;
use approx::assert_relative_eq;
use cropper::prelude::*;

#[test]
fn test_load_reports_format() {
    let rig = test_rig().with_song();
    assert!(rig.engine.is_loaded());
    assert_relative_eq!(rig.engine.duration().unwrap(), 10.0, epsilon = TIME_EPSILON);
    assert_eq!(rig.engine.file_name(), Some("song.wav"));

    let format = rig.engine.input_format().unwrap();
    assert_eq!(format.channels, 2);
    assert_eq!(format.sample_rate, TEST_SAMPLE_RATE);
}

#[test]
fn test_load_from_path() {
    let mut rig = test_rig();
    let path = rig.dir.path().join("voice memo.wav");
    let mono = vec![generate_sine(220.0, 22050, 22050 * 3)];
    std::fs::write(&path, wav_bytes(&mono, 22050)).unwrap();

    rig.engine.load_file(&path).unwrap();
    assert_relative_eq!(rig.engine.duration().unwrap(), 3.0, epsilon = TIME_EPSILON);
    assert_eq!(rig.engine.file_name(), Some("voice memo.wav"));
    assert_eq!(rig.engine.input_format().unwrap().channels, 1);
}

#[test]
fn test_failed_load_keeps_previous_state() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 400.0);
    rig.engine.toggle_clip(id).unwrap();

    let result = rig
        .engine
        .load_bytes(Some("broken.wav"), b"definitely not audio".to_vec());
    assert!(result.is_err());

    assert_relative_eq!(rig.engine.duration().unwrap(), 10.0, epsilon = TIME_EPSILON);
    assert_eq!(rig.engine.regions().len(), 1);
    assert!(rig.engine.is_playing());
    assert_eq!(rig.engine.file_name(), Some("song.wav"));
}

#[test]
fn test_new_load_resets_clips_and_playback() {
    let mut rig = test_rig().with_song();
    let first = rig.drag_clip(200.0, 400.0);
    rig.engine.toggle_clip(first).unwrap();

    rig.load_song(4.0);
    assert!(rig.engine.regions().is_empty());
    assert!(!rig.engine.is_playing());
    assert_eq!(rig.engine.position(), 0.0);

    // Ids restart after a fresh load
    let id = rig.drag_clip(100.0, 300.0);
    assert_eq!(id, first);
}

#[test]
fn test_background_load_installs_on_poll() {
    let mut rig = test_rig();
    let bytes = wav_bytes(&stereo_sine(2.0, TEST_SAMPLE_RATE), TEST_SAMPLE_RATE);
    rig.engine
        .start_load(LoadSource::Bytes {
            name: Some("later.wav".into()),
            bytes,
        })
        .unwrap();
    assert!(rig.engine.is_loading());

    let events = rig.wait_for_events(5000);
    assert_eq!(events.len(), 1);
    match &events[0] {
        EngineEvent::Loaded { duration } => assert_relative_eq!(*duration, 2.0, epsilon = TIME_EPSILON),
        other => panic!("expected load, got {other:?}"),
    }
    assert!(!rig.engine.is_loading());
    assert_eq!(rig.engine.file_name(), Some("later.wav"));
}

#[test]
fn test_background_load_failure_is_reported() {
    let mut rig = test_rig().with_song();
    rig.engine
        .start_load(LoadSource::Bytes {
            name: Some("noise.bin".into()),
            bytes: vec![0x42; 64],
        })
        .unwrap();

    let events = rig.wait_for_events(5000);
    assert!(matches!(events.as_slice(), [EngineEvent::LoadFailed(_)]));
    assert_relative_eq!(rig.engine.duration().unwrap(), 10.0, epsilon = TIME_EPSILON);
}

#[test]
fn test_unload_clears_everything() {
    let mut rig = test_rig().with_song();
    rig.drag_clip(200.0, 400.0);
    rig.engine.unload();

    assert!(!rig.engine.is_loaded());
    assert!(rig.engine.regions().is_empty());
    assert_eq!(rig.engine.duration_label(), None);
}
