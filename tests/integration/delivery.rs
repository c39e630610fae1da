//! Save fallbacks and the blocked-download notice

use crate::helpers::*;
use cropper::media::{MediaError, OpenTarget, SaveTarget};
use cropper::prelude::*;
use cropper::{NamedBlob, BLOCKED_NOTICE};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

struct DeniedSave;

impl SaveTarget for DeniedSave {
    fn save(&self, _file: &NamedBlob) -> cropper::media::Result<PathBuf> {
        Err(MediaError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "sandboxed",
        )))
    }
}

#[derive(Clone, Default)]
struct RecordingOpener {
    opened: Arc<Mutex<Vec<String>>>,
}

impl OpenTarget for RecordingOpener {
    fn open(&self, file: &NamedBlob) -> cropper::media::Result<()> {
        self.opened.lock().unwrap().push(file.file_name.clone());
        Ok(())
    }
}

fn blocked_rig() -> TestRig {
    let mut rig = test_rig_with(|b| b.delivery(DeliveryChain::new().with_save(DeniedSave)));
    rig.load_song(10.0);
    rig
}

fn download_and_wait(rig: &mut TestRig, id: ClipId) -> Vec<EngineEvent> {
    rig.engine.download_clip(id).unwrap();
    rig.wait_for_events(10_000)
}

#[test]
fn test_save_failure_falls_back_to_open() {
    let opener = RecordingOpener::default();
    let chain = DeliveryChain::new()
        .with_save(DeniedSave)
        .with_open(opener.clone());
    let mut rig = test_rig_with(|b| b.delivery(chain));
    rig.load_song(10.0);
    let id = rig.drag_clip(200.0, 300.0);

    let events = download_and_wait(&mut rig, id);
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::Delivered {
            outcome: DeliveryOutcome::Opened,
            ..
        }]
    ));
    assert_eq!(opener.opened.lock().unwrap().len(), 1);
    assert_eq!(rig.engine.notice(), None);
}

#[test]
fn test_blocked_delivery_raises_notice() {
    let mut rig = blocked_rig();
    let id = rig.drag_clip(200.0, 300.0);

    let events = download_and_wait(&mut rig, id);
    match events.as_slice() {
        [EngineEvent::Delivered {
            outcome: DeliveryOutcome::Blocked { notice },
            ..
        }] => assert_eq!(notice, BLOCKED_NOTICE),
        other => panic!("expected a blocked delivery, got {other:?}"),
    }
    assert_eq!(rig.engine.notice(), Some(BLOCKED_NOTICE));

    rig.engine.dismiss_notice();
    assert_eq!(rig.engine.notice(), None);
}

#[test]
fn test_notice_times_out() {
    let mut rig = blocked_rig();
    let id = rig.drag_clip(200.0, 300.0);
    download_and_wait(&mut rig, id);

    rig.clock.advance(7.9);
    assert!(rig.engine.poll().is_empty());
    assert!(rig.engine.notice().is_some());

    rig.clock.advance(0.1);
    assert_eq!(rig.engine.poll(), vec![EngineEvent::NoticeExpired]);
    assert_eq!(rig.engine.notice(), None);
}

#[test]
fn test_repeated_block_keeps_single_notice() {
    let mut rig = blocked_rig();
    let id = rig.drag_clip(200.0, 300.0);

    download_and_wait(&mut rig, id);
    rig.clock.advance(5.0);
    download_and_wait(&mut rig, id);
    assert_eq!(rig.engine.notice(), Some(BLOCKED_NOTICE));

    // Still timed from the first block
    rig.clock.advance(3.0);
    assert_eq!(rig.engine.poll(), vec![EngineEvent::NoticeExpired]);
}

#[test]
fn test_saves_never_overwrite() {
    let mut rig = test_rig().with_song();
    let id = rig.drag_clip(200.0, 300.0);

    download_and_wait(&mut rig, id);
    download_and_wait(&mut rig, id);

    let mut names: Vec<String> = std::fs::read_dir(rig.dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "song---clip-01-00.00.02.000-00.00.03.000-1.00 (1).wav".to_string(),
            "song---clip-01-00.00.02.000-00.00.03.000-1.00.wav".to_string(),
        ]
    );
}
