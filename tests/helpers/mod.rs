//! Test helpers and fixtures for cropper integration tests
//!
//! Engines are built with a [`ManualClock`] and a [`RecordingBackend`] so
//! playback timing and completions are driven by the test, and deliveries
//! land in a per-test temporary directory.

#![allow(dead_code)]

pub mod tolerances;

use cropper::prelude::*;
use cropper::core::{CompletionToken, PlaybackRequest, SessionId};
use cropper::{Arc, ManualClock, PlaybackBackend};
use std::io::Cursor;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Sample rate of generated fixtures.
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// View width used by [`TestRig`]: 100 px per second of a 10 s file.
pub const TEST_VIEW_WIDTH: f64 = 1000.0;

/// Generate a test signal: sine wave at given frequency for specified frames.
pub fn generate_sine(frequency: f64, sample_rate: u32, num_frames: usize) -> Vec<f32> {
    (0..num_frames)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (0.5 * (2.0 * std::f64::consts::PI * frequency * t).sin()) as f32
        })
        .collect()
}

/// Two-channel sine pair (440 Hz left, 660 Hz right).
pub fn stereo_sine(seconds: f64, sample_rate: u32) -> Vec<Vec<f32>> {
    let frames = (seconds * sample_rate as f64).round() as usize;
    vec![
        generate_sine(440.0, sample_rate, frames),
        generate_sine(660.0, sample_rate, frames),
    ]
}

/// 16-bit WAV container bytes for planar `channels`.
pub fn wav_bytes(channels: &[Vec<f32>], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        let frames = channels.first().map_or(0, Vec::len);
        for frame in 0..frames {
            for channel in channels {
                let v = (channel[frame].clamp(-1.0, 1.0) * 32767.0) as i16;
                writer.write_sample(v).expect("write sample");
            }
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Read back a delivered WAV file: (spec, frames).
pub fn read_wav(bytes: &[u8]) -> (hound::WavSpec, usize) {
    let reader = hound::WavReader::new(Cursor::new(bytes)).expect("wav reader");
    let spec = reader.spec();
    let frames = reader.duration() as usize;
    (spec, frames)
}

// =============================================================================
// Recording backend
// =============================================================================

/// What the backend was asked to play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Started {
    pub session: SessionId,
    pub offset: f64,
    pub duration: Option<f64>,
}

#[derive(Default)]
struct Recorded {
    starts: Vec<Started>,
    stops: usize,
    // Kept after stop so tests can deliver late, stale completions.
    tokens: Vec<CompletionToken>,
}

/// Backend that records every start and lets the test finish sessions.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingBackend {
    pub fn starts(&self) -> Vec<Started> {
        self.inner.lock().unwrap().starts.clone()
    }

    pub fn last_start(&self) -> Option<Started> {
        self.inner.lock().unwrap().starts.last().copied()
    }

    pub fn stops(&self) -> usize {
        self.inner.lock().unwrap().stops
    }

    /// Report that `session` played to its end, even if it was superseded.
    pub fn complete(&self, session: SessionId) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(idx) = inner.tokens.iter().position(|t| t.session() == session) {
            inner.tokens.remove(idx).complete();
        }
    }

    /// Finish the most recently started session.
    pub fn complete_latest(&self) {
        if let Some(start) = self.last_start() {
            self.complete(start.session);
        }
    }
}

impl PlaybackBackend for RecordingBackend {
    fn start(&mut self, request: PlaybackRequest) -> cropper::core::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.starts.push(Started {
            session: request.completion.session(),
            offset: request.offset,
            duration: request.duration,
        });
        inner.tokens.push(request.completion);
        Ok(())
    }

    fn stop(&mut self) {
        self.inner.lock().unwrap().stops += 1;
    }
}

// =============================================================================
// Engine fixture
// =============================================================================

pub struct TestRig {
    pub engine: CropperEngine,
    pub clock: ManualClock,
    pub backend: RecordingBackend,
    pub dir: TempDir,
}

impl TestRig {
    /// Load a 10 s stereo 44.1 kHz sine pair named `song.wav`.
    pub fn with_song(mut self) -> Self {
        self.load_song(10.0);
        self
    }

    pub fn load_song(&mut self, seconds: f64) {
        let bytes = wav_bytes(&stereo_sine(seconds, TEST_SAMPLE_RATE), TEST_SAMPLE_RATE);
        self.engine
            .load_bytes(Some("song.wav"), bytes)
            .expect("load test song");
    }

    /// Drag from `x0` to `x1` and return the created clip.
    pub fn drag_clip(&mut self, x0: f64, x1: f64) -> ClipId {
        self.engine.pointer_down(x0);
        self.engine.pointer_move(x1);
        match self.engine.pointer_up().expect("pointer up") {
            GestureOutcome::Created(id) => id,
            other => panic!("expected a new clip, got {other:?}"),
        }
    }

    /// A press and release at `x` without moving.
    pub fn click(&mut self, x: f64) -> GestureOutcome {
        self.engine.pointer_down(x);
        self.engine.pointer_up().expect("pointer up")
    }

    /// Poll until at least one event arrives or `timeout_ms` passes.
    pub fn wait_for_events(&mut self, timeout_ms: u64) -> Vec<EngineEvent> {
        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        loop {
            let events = self.engine.poll();
            if !events.is_empty() || start.elapsed() >= timeout {
                return events;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }
}

/// Route engine logs to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builder preset: manual clock, recording backend, delivery into a temp dir,
/// WAV encoding and a 1000 x 100 view.
pub fn rig_builder(clock: &ManualClock, backend: &RecordingBackend, dir: &TempDir) -> CropperEngineBuilder {
    CropperEngine::builder()
        .clock(Arc::new(clock.clone()))
        .backend(backend.clone())
        .encoder(Arc::new(cropper::export::WavEncoderFactory))
        .delivery(DeliveryChain::to_directory(dir.path()))
        .view(TEST_VIEW_WIDTH, 100.0, 1.0)
}

pub fn test_rig() -> TestRig {
    test_rig_with(|builder| builder)
}

/// Like [`test_rig`] with extra builder configuration.
pub fn test_rig_with(configure: impl FnOnce(CropperEngineBuilder) -> CropperEngineBuilder) -> TestRig {
    init_tracing();
    let clock = ManualClock::new();
    let backend = RecordingBackend::default();
    let dir = tempfile::tempdir().expect("temp dir");
    let engine = configure(rig_builder(&clock, &backend, &dir))
        .build()
        .expect("Failed to create test engine");
    TestRig {
        engine,
        clock,
        backend,
        dir,
    }
}
