//! Playback sessions.
//!
//! At most one source is audible at a time. Every start first invalidates
//! the previous session, and completion notifications carry the session id
//! captured at start so a late notification from a superseded source is
//! dropped instead of clobbering the current transport state.

use crate::buffer::DecodedBuffer;
use crate::clock::TransportClock;
use crate::config::EditorConfig;
use crate::region::{Clip, ClipId};
use crate::Result;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Handed to the backend with each start. Consuming it reports that the
/// source reached its natural end.
#[derive(Debug)]
pub struct CompletionToken {
    session: SessionId,
    tx: Sender<SessionId>,
}

impl CompletionToken {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn complete(self) {
        // The manager may already be gone.
        let _ = self.tx.send(self.session);
    }
}

/// One request to make sound.
#[derive(Debug)]
pub struct PlaybackRequest {
    pub buffer: Arc<DecodedBuffer>,
    /// Start position in seconds.
    pub offset: f64,
    /// Play this long, or to the end of the buffer when `None`.
    pub duration: Option<f64>,
    pub completion: CompletionToken,
}

/// Audio output seam.
pub trait PlaybackBackend: Send {
    /// Begin producing sound. Any previous source has already been stopped.
    fn start(&mut self, request: PlaybackRequest) -> Result<()>;

    /// Silence the current source synchronously. Its completion token should
    /// be dropped without completing.
    fn stop(&mut self);
}

/// Backend that makes no sound and never completes on its own.
#[derive(Debug, Default)]
pub struct NullBackend {
    current: Option<CompletionToken>,
}

impl PlaybackBackend for NullBackend {
    fn start(&mut self, request: PlaybackRequest) -> Result<()> {
        self.current = Some(request.completion);
        Ok(())
    }

    fn stop(&mut self) {
        self.current = None;
    }
}

pub struct PlaybackSessionManager {
    backend: Box<dyn PlaybackBackend>,
    clock: Arc<dyn TransportClock>,
    rewind_epsilon: f64,
    min_play_duration: f64,

    buffer: Option<Arc<DecodedBuffer>>,
    session: u64,
    play_offset: f64,
    start_time: f64,
    /// Where the current (or last) source stops on its own.
    region_end: f64,
    playing: bool,
    active_clip: Option<ClipId>,

    ended_tx: Sender<SessionId>,
    ended_rx: Receiver<SessionId>,
}

impl PlaybackSessionManager {
    pub fn new(
        backend: Box<dyn PlaybackBackend>,
        clock: Arc<dyn TransportClock>,
        config: &EditorConfig,
    ) -> Self {
        let (ended_tx, ended_rx) = crossbeam_channel::unbounded();
        Self {
            backend,
            clock,
            rewind_epsilon: config.rewind_epsilon,
            min_play_duration: config.min_play_duration,
            buffer: None,
            session: 0,
            play_offset: 0.0,
            start_time: 0.0,
            region_end: 0.0,
            playing: false,
            active_clip: None,
            ended_tx,
            ended_rx,
        }
    }

    /// Adopt a new buffer. Stops playback and rewinds.
    pub fn load(&mut self, buffer: Arc<DecodedBuffer>) {
        self.stop_playback();
        self.region_end = buffer.duration();
        self.buffer = Some(buffer);
        self.play_offset = 0.0;
        self.active_clip = None;
    }

    pub fn unload(&mut self) {
        self.stop_playback();
        self.buffer = None;
        self.play_offset = 0.0;
        self.region_end = 0.0;
        self.active_clip = None;
    }

    pub fn buffer(&self) -> Option<&Arc<DecodedBuffer>> {
        self.buffer.as_ref()
    }

    pub fn duration(&self) -> Option<f64> {
        self.buffer.as_ref().map(|b| b.duration())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play_offset(&self) -> f64 {
        self.play_offset
    }

    pub fn active_clip(&self) -> Option<ClipId> {
        self.active_clip
    }

    pub fn current_session(&self) -> SessionId {
        SessionId(self.session)
    }

    /// Playhead: the offset plus elapsed time while playing, clamped to the media.
    pub fn position(&self) -> f64 {
        let Some(duration) = self.duration() else {
            return 0.0;
        };
        if self.playing {
            let t = self.play_offset + (self.clock.now() - self.start_time);
            t.clamp(0.0, self.region_end.min(duration))
        } else {
            self.play_offset.clamp(0.0, duration)
        }
    }

    /// Whole-file playback from `offset_override`, or from the current
    /// offset rewinding to zero when it sits at the end.
    pub fn play_whole(&mut self, offset_override: Option<f64>) -> Result<()> {
        let Some(duration) = self.duration() else {
            return Ok(());
        };
        self.stop_playback();

        let clamp = |t: f64| if t.is_finite() { t.clamp(0.0, duration) } else { 0.0 };
        let offset = match offset_override {
            Some(t) => clamp(t),
            None => {
                let offset = clamp(self.play_offset);
                if offset >= duration - self.rewind_epsilon {
                    0.0
                } else {
                    offset
                }
            }
        };

        self.begin(offset, None, duration, None)
    }

    /// Play a clip from its start. Clips too short to hear are skipped.
    pub fn play_clip(&mut self, clip: &Clip) -> Result<()> {
        if self.buffer.is_none() {
            return Ok(());
        }
        self.stop_playback();

        let duration = clip.duration();
        if duration <= self.min_play_duration {
            return Ok(());
        }

        self.begin(clip.start, Some(duration), clip.end, Some(clip.id))
    }

    /// Continue a clip from the current offset when it lies inside the
    /// clip, otherwise from the clip start.
    pub fn resume_clip(&mut self, clip: &Clip) -> Result<()> {
        if self.buffer.is_none() {
            return Ok(());
        }
        self.stop_playback();

        let mut offset = self.play_offset;
        if offset < clip.start || offset >= clip.end - self.rewind_epsilon {
            offset = clip.start;
        }
        let remaining = (clip.end - offset).max(0.0);
        if remaining <= self.min_play_duration {
            return Ok(());
        }

        self.begin(offset, Some(remaining), clip.end, Some(clip.id))
    }

    /// Stop and remember where we were. The active clip is kept.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        let elapsed = (self.clock.now() - self.start_time).max(0.0);
        self.play_offset = (self.play_offset + elapsed).min(self.region_end);
        self.stop_playback();
    }

    /// Stop and rewind to the start of the file.
    pub fn stop(&mut self) {
        self.stop_playback();
        self.play_offset = 0.0;
        self.active_clip = None;
    }

    pub fn seek_and_play(&mut self, t: f64) -> Result<()> {
        let Some(duration) = self.duration() else {
            return Ok(());
        };
        let t = if t.is_finite() { t.clamp(0.0, duration) } else { 0.0 };
        self.play_offset = t;
        self.active_clip = None;
        self.play_whole(Some(t))
    }

    /// Apply a completion notification. Returns `false` for stale sessions.
    pub fn handle_ended(&mut self, session: SessionId) -> bool {
        if session.0 != self.session || !self.playing {
            tracing::debug!(
                "Ignoring stale completion for session {} (current {})",
                session.0,
                self.session
            );
            return false;
        }
        self.playing = false;
        self.play_offset = self.region_end;
        tracing::debug!("Session {} ended at {:.3}s", session.0, self.play_offset);
        true
    }

    /// Drain completion notifications. Returns `true` if any changed state.
    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(session) = self.ended_rx.try_recv() {
            changed |= self.handle_ended(session);
        }
        changed
    }

    fn stop_playback(&mut self) {
        self.session += 1;
        self.backend.stop();
        self.playing = false;
    }

    /// Offset and active clip change only once the backend has started.
    fn begin(
        &mut self,
        offset: f64,
        duration: Option<f64>,
        region_end: f64,
        clip: Option<ClipId>,
    ) -> Result<()> {
        let Some(buffer) = self.buffer.clone() else {
            return Ok(());
        };

        self.session += 1;
        let session = SessionId(self.session);
        let request = PlaybackRequest {
            buffer,
            offset,
            duration,
            completion: CompletionToken {
                session,
                tx: self.ended_tx.clone(),
            },
        };

        if let Err(e) = self.backend.start(request) {
            tracing::warn!("Playback backend failed to start session {}: {e}", session.0);
            self.playing = false;
            return Err(e);
        }

        self.start_time = self.clock.now();
        self.region_end = region_end;
        self.play_offset = offset;
        self.active_clip = clip;
        self.playing = true;
        tracing::debug!(
            "Started session {} at {offset:.3}s ({})",
            session.0,
            match duration {
                Some(d) => format!("{d:.3}s"),
                None => "to end".to_string(),
            }
        );
        Ok(())
    }
}
