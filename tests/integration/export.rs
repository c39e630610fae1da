//! Clip and bundle export through the engine

use crate::helpers::*;
use cropper::export::{BlockEncoder, EncodeSpec, ExportError};
use cropper::prelude::*;
use cropper::{Arc, EncoderFactory, PREPARING_LABEL};

/// Encoder whose streams always fail.
struct RejectingEncoder;

impl EncoderFactory for RejectingEncoder {
    fn create(&self, _spec: EncodeSpec) -> cropper::export::Result<Box<dyn BlockEncoder>> {
        Err(ExportError::Encoding("encoder offline".into()))
    }

    fn extension(&self) -> &'static str {
        "mp3"
    }

    fn mime(&self) -> &'static str {
        "audio/mpeg"
    }
}

/// WAV output that takes a while to open each stream.
struct SlowWavEncoder;

impl EncoderFactory for SlowWavEncoder {
    fn create(&self, spec: EncodeSpec) -> cropper::export::Result<Box<dyn BlockEncoder>> {
        std::thread::sleep(std::time::Duration::from_millis(300));
        cropper::export::WavEncoderFactory.create(spec)
    }

    fn extension(&self) -> &'static str {
        "wav"
    }

    fn mime(&self) -> &'static str {
        "audio/wav"
    }
}

fn delivered(events: &[EngineEvent]) -> Vec<(String, DeliveryOutcome)> {
    events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::Delivered { file_name, outcome } => {
                Some((file_name.clone(), outcome.clone()))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_stereo_clip_export_scenario() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 450.0);

    let row = &rig.engine.clip_rows()[0];
    assert_eq!(row.length, "2.50s");

    let named = rig.engine.export_clip_now(id).unwrap();
    assert_eq!(
        named.file_name,
        "song---clip-01-00.00.02.000-00.00.04.500-2.50.wav"
    );
    assert!(!named.blob.is_empty());
    assert_eq!(named.blob.mime, "audio/wav");

    let (spec, frames) = read_wav(&named.blob.bytes);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(frames, 110250);
}

#[test]
fn test_mono_source_exports_mono() {
    let mut rig = test_rig();
    let mono = vec![generate_sine(330.0, 48000, 48000 * 4)];
    rig.engine
        .load_bytes(Some("take.wav"), wav_bytes(&mono, 48000))
        .unwrap();
    // 4 s over 1000 px: 250 px per second
    let id = rig.drag_clip(250.0, 500.0);

    let named = rig.engine.export_clip_now(id).unwrap();
    let (spec, frames) = read_wav(&named.blob.bytes);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(frames, 48000);
}

#[test]
fn test_export_names_use_position() {
    let mut rig = test_rig().with_song();
    let late = rig.drag_clip(600.0, 700.0);
    rig.drag_clip(100.0, 200.0);

    let named = rig.engine.export_clip_now(late).unwrap();
    assert!(named.file_name.starts_with("song---clip-02-"), "{}", named.file_name);
}

#[test]
fn test_export_all_bundles_archive() {
    let mut rig = test_rig().with_song();
    rig.drag_clip(100.0, 200.0);
    rig.drag_clip(500.0, 550.0);

    let named = rig.engine.export_all_now().unwrap();
    assert_eq!(named.file_name, "song---clips.zip");
    assert_eq!(named.blob.mime, "application/zip");
    assert_eq!(&named.blob.bytes[..2], b"PK");
}

#[test]
fn test_export_without_media_fails() {
    let rig = test_rig();
    assert!(rig.engine.export_all_now().is_err());
    assert!(rig.engine.export_clip_now(ClipId(1)).is_err());
}

#[test]
fn test_background_download_saves_file() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 450.0);

    rig.engine.download_clip(id).unwrap();
    assert!(rig.engine.is_preparing(id));
    assert_eq!(rig.engine.download_label(id), PREPARING_LABEL);
    assert!(!rig.engine.clip_rows()[0].download_enabled);

    // Already preparing: ignored
    rig.engine.download_clip(id).unwrap();

    let events = rig.wait_for_events(10_000);
    let files = delivered(&events);
    assert_eq!(files.len(), 1);
    let (file_name, outcome) = &files[0];
    assert!(file_name.ends_with(".wav"));
    match outcome {
        DeliveryOutcome::Saved(path) => {
            assert!(path.starts_with(rig.dir.path()));
            assert!(path.exists());
        }
        other => panic!("expected a saved file, got {other:?}"),
    }

    assert!(!rig.engine.is_preparing(id));
    assert_eq!(rig.engine.download_label(id), "Download");
    assert!(rig.engine.poll().is_empty());
}

#[test]
fn test_background_download_uses_snapshot() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 450.0);

    rig.engine.download_clip(id).unwrap();
    rig.engine.delete_clip(id);

    let files = delivered(&rig.wait_for_events(10_000));
    assert_eq!(
        files[0].0,
        "song---clip-01-00.00.02.000-00.00.04.500-2.50.wav"
    );
}

#[test]
fn test_download_all_state() {
    let mut rig = test_rig().with_song();
    assert!(!rig.engine.download_all_enabled());
    rig.engine.download_all().unwrap();
    assert!(!rig.engine.is_preparing_all());

    rig.drag_clip(100.0, 200.0);
    assert!(rig.engine.download_all_enabled());
    assert_eq!(rig.engine.download_all_label(), "Download All");

    rig.engine.download_all().unwrap();
    assert!(!rig.engine.download_all_enabled());
    assert_eq!(rig.engine.download_all_label(), PREPARING_LABEL);

    let files = delivered(&rig.wait_for_events(10_000));
    assert_eq!(files[0].0, "song---clips.zip");
    assert!(rig.engine.download_all_enabled());
}

#[test]
fn test_failed_export_reverts_affordance() {
    let mut rig = test_rig_with(|b| b.encoder(Arc::new(RejectingEncoder)));
    rig.load_song(10.0);
    let id = rig.drag_clip(200.0, 450.0);

    rig.engine.download_clip(id).unwrap();
    let events = rig.wait_for_events(10_000);
    match events.as_slice() {
        [EngineEvent::ExportFailed { clip, error }] => {
            assert_eq!(*clip, Some(id));
            assert!(error.contains("encoder offline"), "{error}");
        }
        other => panic!("expected an export failure, got {other:?}"),
    }
    assert_eq!(rig.engine.download_label(id), "Download");
    assert_eq!(std::fs::read_dir(rig.dir.path()).unwrap().count(), 0);
}

#[test]
fn test_reload_discards_running_exports() {
    let mut rig = test_rig_with(|b| b.encoder(Arc::new(SlowWavEncoder)));
    rig.load_song(10.0);
    let old = rig.drag_clip(200.0, 450.0);
    rig.engine.download_clip(old).unwrap();
    rig.engine.download_all().unwrap();
    assert!(rig.engine.is_preparing(old));

    // Ids restart with the new file, so the new clip reuses the old id
    rig.load_song(5.0);
    let new = rig.drag_clip(200.0, 400.0);
    assert_eq!(new, old);
    assert!(!rig.engine.is_preparing(new));
    assert!(!rig.engine.is_preparing_all());
    assert_eq!(rig.engine.download_label(new), "Download");

    rig.engine.download_clip(new).unwrap();
    assert!(rig.engine.is_preparing(new));

    let mut events = rig.wait_for_events(10_000);
    std::thread::sleep(std::time::Duration::from_millis(900));
    events.extend(rig.engine.poll());

    let files = delivered(&events);
    assert_eq!(files.len(), 1, "{events:?}");
    assert_eq!(
        files[0].0,
        "song---clip-01-00.00.01.000-00.00.02.000-1.00.wav"
    );
    assert_eq!(std::fs::read_dir(rig.dir.path()).unwrap().count(), 1);
}

#[test]
fn test_unload_discards_running_exports() {
    let mut rig = test_rig_with(|b| b.encoder(Arc::new(SlowWavEncoder)));
    rig.load_song(10.0);
    let id = rig.drag_clip(200.0, 450.0);
    rig.engine.download_clip(id).unwrap();

    rig.engine.unload();
    assert!(!rig.engine.is_preparing(id));

    std::thread::sleep(std::time::Duration::from_millis(900));
    assert!(rig.engine.poll().is_empty());
    assert_eq!(std::fs::read_dir(rig.dir.path()).unwrap().count(), 0);
}
