//! CropperEngine that ties the editing model to decoding, playback, drawing and export

use crate::builder::CropperEngineBuilder;
use crate::Result;
use cropper_analysis::{render, Canvas, EnvelopeCache, RenderStyle, Scene};
use cropper_core::{
    Arc, Clip, ClipId, Color, Cursor, DecodedBuffer, DragMachine, EditorConfig, Error as CoreError,
    GestureOutcome, InputFormat, NamedBlob, PlaybackBackend, PlaybackSessionManager, RegionModel,
    TimeMapper, TransportClock,
};
use cropper_export::{
    base_name, colon_markers, ui_time, ExportHandle, ExportJob, ExportPipeline, ExportStatus,
};
use cropper_media::{
    load, ContainerDecoder, DeliveryChain, DeliveryOutcome, LoadHandle, LoadSource, LoadStatus,
    LoadedMedia,
};
use std::collections::HashMap;
use std::path::Path;

pub const PLAY_LABEL: &str = "Play";
pub const PAUSE_LABEL: &str = "Pause";
pub const DOWNLOAD_LABEL: &str = "Download";
pub const DOWNLOAD_ALL_LABEL: &str = "Download All";
pub const PREPARING_LABEL: &str = "Preparing…";
pub const NO_CLIPS_LABEL: &str = "No clips yet.";

/// Something the host should react to, returned from [`CropperEngine::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A background load finished and its media is installed.
    Loaded { duration: f64 },
    /// A background load was rejected. The previous media is still loaded.
    LoadFailed(String),
    /// The current playback session reached its natural end.
    PlaybackEnded,
    /// An export finished and went through the delivery chain.
    Delivered {
        file_name: String,
        outcome: DeliveryOutcome,
    },
    /// An export failed. `clip` is `None` for the download-all bundle.
    ExportFailed { clip: Option<ClipId>, error: String },
    /// The blocked-download notice timed out.
    NoticeExpired,
}

/// One line of the clip list, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRow {
    pub id: ClipId,
    /// Positional number, 1-based.
    pub number: usize,
    pub color: Color,
    /// `Clip 01`
    pub title: String,
    /// `(00:00:02:00 – 00:00:04:50)`
    pub span: String,
    pub markers: String,
    /// `2.50s`
    pub length: String,
    pub play_label: &'static str,
    pub download_label: &'static str,
    /// `false` while this clip's export is being prepared.
    pub download_enabled: bool,
}

impl ClipRow {
    /// `{span} {markers} {length}`, the text shown next to the title.
    pub fn detail(&self) -> String {
        format!("{} {} {}", self.span, self.markers, self.length)
    }
}

/// View size in CSS pixels plus the device-pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct View {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl View {
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        let sane = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            width: sane(width, 0.0),
            height: sane(height, 0.0),
            dpr: sane(dpr, 1.0),
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(800.0, 128.0, 1.0)
    }
}

struct MediaInfo {
    format: InputFormat,
    file_name: Option<String>,
}

struct Notice {
    text: String,
    raised_at: f64,
}

pub(crate) struct EngineParts {
    pub config: EditorConfig,
    pub backend: Box<dyn PlaybackBackend>,
    pub clock: Arc<dyn TransportClock>,
    pub decoder: Arc<dyn ContainerDecoder>,
    pub pipeline: ExportPipeline,
    pub delivery: DeliveryChain,
    pub envelopes: EnvelopeCache,
    pub style: RenderStyle,
    pub view: View,
}

/// Audio clip editor.
///
/// Owns the buffer-backed playback session, the clip set and the pointer
/// state machine. Hosts forward input, call [`poll`](Self::poll) once per
/// frame and redraw when [`needs_redraw`](Self::needs_redraw) says so. All
/// mutation happens on the caller's thread; background loads and exports
/// work on snapshots and are collected by `poll`.
///
/// # Example
///
/// ```ignore
/// use cropper::prelude::*;
///
/// let mut engine = CropperEngine::builder().build()?;
/// engine.load_file("interview.flac")?;
///
/// engine.pointer_down(120.0);
/// engine.pointer_move(380.0);
/// if let GestureOutcome::Created(id) = engine.pointer_up()? {
///     engine.download_clip(id)?;
/// }
///
/// loop {
///     for event in engine.poll() {
///         println!("{event:?}");
///     }
///     if engine.needs_redraw() {
///         engine.render(&mut canvas);
///     }
/// }
/// ```
pub struct CropperEngine {
    config: EditorConfig,
    regions: RegionModel,
    drag: DragMachine,
    session: PlaybackSessionManager,
    clock: Arc<dyn TransportClock>,

    envelopes: EnvelopeCache,
    style: RenderStyle,
    view: View,

    decoder: Arc<dyn ContainerDecoder>,
    media: Option<MediaInfo>,
    pending_load: Option<LoadHandle>,

    pipeline: ExportPipeline,
    delivery: DeliveryChain,
    clip_exports: HashMap<ClipId, ExportHandle>,
    bundle_export: Option<ExportHandle>,
    notice: Option<Notice>,

    dirty: bool,
}

impl CropperEngine {
    pub fn builder() -> CropperEngineBuilder {
        CropperEngineBuilder::default()
    }

    pub(crate) fn from_parts(parts: EngineParts) -> Self {
        let session =
            PlaybackSessionManager::new(parts.backend, parts.clock.clone(), &parts.config);
        Self {
            regions: RegionModel::new(parts.config.clone()),
            drag: DragMachine::new(&parts.config),
            session,
            clock: parts.clock,
            envelopes: parts.envelopes,
            style: parts.style,
            view: parts.view,
            decoder: parts.decoder,
            media: None,
            pending_load: None,
            pipeline: parts.pipeline,
            delivery: parts.delivery,
            clip_exports: HashMap::new(),
            bundle_export: None,
            notice: None,
            dirty: true,
            config: parts.config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn regions(&self) -> &RegionModel {
        &self.regions
    }

    pub fn session(&self) -> &PlaybackSessionManager {
        &self.session
    }

    pub fn drag(&self) -> &DragMachine {
        &self.drag
    }

    pub fn pipeline(&self) -> &ExportPipeline {
        &self.pipeline
    }

    pub fn is_loaded(&self) -> bool {
        self.session.buffer().is_some()
    }

    pub fn duration(&self) -> Option<f64> {
        self.session.duration()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.media.as_ref().and_then(|m| m.file_name.as_deref())
    }

    pub fn input_format(&self) -> Option<InputFormat> {
        self.media.as_ref().map(|m| m.format)
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    pub fn position(&self) -> f64 {
        self.session.position()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Decode and install a file, blocking until done.
    ///
    /// On failure the current media, clips and playback are left alone.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_source(LoadSource::Path(path.as_ref().to_path_buf()))
    }

    /// Decode and install in-memory container bytes. `name` is the original
    /// file name, used for the extension hint and export names.
    pub fn load_bytes(&mut self, name: Option<&str>, bytes: Vec<u8>) -> Result<()> {
        self.load_source(LoadSource::Bytes {
            name: name.map(str::to_string),
            bytes,
        })
    }

    pub fn load_source(&mut self, source: LoadSource) -> Result<()> {
        match load(self.decoder.as_ref(), source) {
            Ok(media) => {
                self.install(media);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "load failed, keeping current media");
                Err(e.into())
            }
        }
    }

    /// Decode on a worker thread. The result is installed by [`poll`](Self::poll).
    /// A load still in flight is abandoned.
    pub fn start_load(&mut self, source: LoadSource) -> Result<()> {
        self.pending_load = Some(LoadHandle::start(self.decoder.clone(), source)?);
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    fn install(&mut self, media: LoadedMedia) {
        let duration = media.buffer.duration();
        self.abandon_exports();
        self.drag = DragMachine::new(&self.config);
        self.regions.reset(duration);
        self.session.load(media.buffer);
        self.envelopes.clear();
        self.media = Some(MediaInfo {
            format: media.format,
            file_name: media.file_name,
        });
        self.dirty = true;
        tracing::info!(duration, "media installed");
    }

    /// Drop the current media and every clip.
    pub fn unload(&mut self) {
        self.abandon_exports();
        self.drag = DragMachine::new(&self.config);
        self.session.unload();
        self.regions.reset(0.0);
        self.envelopes.clear();
        self.media = None;
        self.dirty = true;
    }

    /// Detach exports of the outgoing media. Clip ids restart with the new
    /// clip set, so their results must never reach the new clips.
    fn abandon_exports(&mut self) {
        let pending = self.clip_exports.len() + usize::from(self.bundle_export.is_some());
        if pending > 0 {
            tracing::info!(pending, "discarding exports of the previous media");
        }
        self.clip_exports.clear();
        self.bundle_export = None;
    }

    // =========================================================================
    // View
    // =========================================================================

    /// New view size in CSS pixels and device-pixel ratio.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.view = View::new(width, height, dpr);
        self.dirty = true;
    }

    pub fn view_size(&self) -> (f64, f64) {
        (self.view.width, self.view.height)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.view.dpr
    }

    /// Canvas size in device pixels for the current view.
    pub fn canvas_size(&self) -> (u32, u32) {
        let device = |css: f64| (css * self.view.dpr).round().max(0.0) as u32;
        (device(self.view.width), device(self.view.height))
    }

    pub fn mapper(&self) -> TimeMapper {
        TimeMapper::new(self.view.width, self.duration())
    }

    pub fn is_wide_layout(&self) -> bool {
        self.view.width >= self.config.wide_layout_px
    }

    // =========================================================================
    // Pointer input (x in CSS pixels from the view's left edge)
    // =========================================================================

    pub fn pointer_down(&mut self, x: f64) -> Cursor {
        if !self.is_loaded() {
            return self.drag.cursor();
        }
        let mapper = self.mapper();
        let cursor = self.drag.pointer_down(x, &mapper, &self.regions);
        self.dirty = true;
        cursor
    }

    /// Returns the cursor to show at `x`.
    pub fn pointer_move(&mut self, x: f64) -> Cursor {
        if !self.is_loaded() {
            return self.drag.cursor();
        }
        let mapper = self.mapper();
        if self.drag.pointer_move(x, &mapper, &mut self.regions) {
            self.dirty = true;
        }
        self.drag.cursor()
    }

    /// Finish the gesture. A click seeks and starts whole-file playback.
    pub fn pointer_up(&mut self) -> Result<GestureOutcome> {
        if !self.is_loaded() {
            return Ok(GestureOutcome::None);
        }
        let outcome = self.drag.pointer_up(&mut self.regions);
        self.dirty = true;
        if let GestureOutcome::Seek(t) = outcome {
            self.session.seek_and_play(t)?;
        }
        Ok(outcome)
    }

    /// Abandon the gesture, e.g. when the pointer leaves the window.
    pub fn pointer_cancel(&mut self) {
        self.drag.cancel(&mut self.regions);
        self.dirty = true;
    }

    pub fn cursor(&self) -> Cursor {
        self.drag.cursor()
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Pause when playing, otherwise play the whole file from the offset.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if !self.is_loaded() {
            return Ok(());
        }
        if self.session.is_playing() {
            self.session.pause();
        } else {
            self.session.play_whole(None)?;
        }
        self.dirty = true;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.dirty = true;
    }

    /// Per-clip play button: pause or resume the active clip, or start `id`.
    pub fn toggle_clip(&mut self, id: ClipId) -> Result<()> {
        if !self.is_loaded() {
            return Ok(());
        }
        let clip = *self.regions.get(id).ok_or(CoreError::UnknownClip(id.0))?;
        if self.session.active_clip() == Some(id) {
            if self.session.is_playing() {
                self.session.pause();
            } else {
                self.session.resume_clip(&clip)?;
            }
        } else {
            self.session.play_clip(&clip)?;
        }
        self.dirty = true;
        Ok(())
    }

    pub fn transport_label(&self) -> &'static str {
        if self.session.is_playing() {
            PAUSE_LABEL
        } else {
            PLAY_LABEL
        }
    }

    pub fn clip_play_label(&self, id: ClipId) -> &'static str {
        if self.session.is_playing() && self.session.active_clip() == Some(id) {
            PAUSE_LABEL
        } else {
            PLAY_LABEL
        }
    }

    // =========================================================================
    // Clips
    // =========================================================================

    /// Playback is not interrupted, even if `id` is the clip being heard.
    pub fn delete_clip(&mut self, id: ClipId) -> Option<Clip> {
        let removed = self.regions.delete_clip(id);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn clear_clips(&mut self) {
        self.regions.clear();
        self.dirty = true;
    }

    /// `Duration: 12.34s` once media is loaded.
    pub fn duration_label(&self) -> Option<String> {
        self.duration().map(|d| format!("Duration: {d:.2}s"))
    }

    pub fn clip_rows(&self) -> Vec<ClipRow> {
        let wide = self.is_wide_layout();
        self.regions
            .ordered()
            .into_iter()
            .enumerate()
            .map(|(idx, clip)| {
                let preparing = self.is_preparing(clip.id);
                ClipRow {
                    id: clip.id,
                    number: idx + 1,
                    color: clip.color,
                    title: format!("Clip {:02}", idx + 1),
                    span: format!("({} – {})", ui_time(clip.start), ui_time(clip.end)),
                    markers: colon_markers(clip.duration(), wide),
                    length: format!("{:.2}s", clip.duration()),
                    play_label: self.clip_play_label(clip.id),
                    download_label: if preparing {
                        PREPARING_LABEL
                    } else {
                        DOWNLOAD_LABEL
                    },
                    download_enabled: !preparing,
                }
            })
            .collect()
    }

    /// Text for the clip list when it has no rows.
    pub fn clip_list_placeholder(&self) -> Option<&'static str> {
        self.regions.is_empty().then_some(NO_CLIPS_LABEL)
    }

    // =========================================================================
    // Export
    // =========================================================================

    fn base_name(&self) -> String {
        base_name(self.file_name())
    }

    fn export_source(&self) -> Result<(Arc<DecodedBuffer>, InputFormat)> {
        let buffer = self.session.buffer().ok_or(CoreError::NoMedia)?.clone();
        let format = self
            .input_format()
            .unwrap_or_else(|| buffer.input_format());
        Ok((buffer, format))
    }

    /// Encode one clip right away, named by its current position.
    pub fn export_clip_now(&self, id: ClipId) -> Result<NamedBlob> {
        let (buffer, format) = self.export_source()?;
        let clip = self.regions.get(id).ok_or(CoreError::UnknownClip(id.0))?;
        let number = self.regions.clip_number(id).unwrap_or(1);
        Ok(self
            .pipeline
            .export_clip_named(&buffer, format, clip, number, &self.base_name())?)
    }

    /// Encode every clip into one archive right away.
    pub fn export_all_now(&self) -> Result<NamedBlob> {
        let (buffer, format) = self.export_source()?;
        Ok(self
            .pipeline
            .export_all(&buffer, format, self.regions.clips(), &self.base_name())?)
    }

    /// Export `id` in the background and deliver it when done. Does nothing
    /// while that clip is already being prepared.
    pub fn download_clip(&mut self, id: ClipId) -> Result<()> {
        if self.clip_exports.contains_key(&id) {
            return Ok(());
        }
        let (buffer, format) = self.export_source()?;
        let clip = *self.regions.get(id).ok_or(CoreError::UnknownClip(id.0))?;
        let number = self.regions.clip_number(id).unwrap_or(1);
        let handle = ExportHandle::spawn(
            self.pipeline.clone(),
            buffer,
            format,
            ExportJob::Clip { clip, number },
            self.base_name(),
        )?;
        self.clip_exports.insert(id, handle);
        self.dirty = true;
        Ok(())
    }

    /// Bundle every clip in the background. Ignored while disabled.
    pub fn download_all(&mut self) -> Result<()> {
        if !self.download_all_enabled() {
            return Ok(());
        }
        let (buffer, format) = self.export_source()?;
        let handle = ExportHandle::spawn(
            self.pipeline.clone(),
            buffer,
            format,
            ExportJob::All {
                clips: self.regions.clips().to_vec(),
            },
            self.base_name(),
        )?;
        self.bundle_export = Some(handle);
        self.dirty = true;
        Ok(())
    }

    pub fn is_preparing(&self, id: ClipId) -> bool {
        self.clip_exports.contains_key(&id)
    }

    pub fn is_preparing_all(&self) -> bool {
        self.bundle_export.is_some()
    }

    pub fn download_label(&self, id: ClipId) -> &'static str {
        if self.is_preparing(id) {
            PREPARING_LABEL
        } else {
            DOWNLOAD_LABEL
        }
    }

    pub fn download_all_label(&self) -> &'static str {
        if self.is_preparing_all() {
            PREPARING_LABEL
        } else {
            DOWNLOAD_ALL_LABEL
        }
    }

    pub fn download_all_enabled(&self) -> bool {
        self.is_loaded()
            && !self.regions.is_empty()
            && !self.is_preparing_all()
            && self.pipeline.has_archive()
    }

    // =========================================================================
    // Notice
    // =========================================================================

    /// The blocked-download notice, while it is up.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    pub fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.dirty = true;
        }
    }

    /// At most one notice at a time. Raising again while one is up keeps
    /// the original timeout.
    fn raise_notice(&mut self, text: String) {
        if self.notice.is_some() {
            return;
        }
        self.notice = Some(Notice {
            text,
            raised_at: self.clock.now(),
        });
        self.dirty = true;
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Collect finished background work and playback completions.
    pub fn poll(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();

        if self.session.poll_events() {
            self.dirty = true;
            events.push(EngineEvent::PlaybackEnded);
        }
        self.poll_load(&mut events);
        self.poll_exports(&mut events);

        let expired = self
            .notice
            .as_ref()
            .is_some_and(|n| self.clock.now() - n.raised_at >= self.config.notice_secs);
        if expired {
            self.notice = None;
            self.dirty = true;
            events.push(EngineEvent::NoticeExpired);
        }

        events
    }

    fn poll_load(&mut self, events: &mut Vec<EngineEvent>) {
        let Some(handle) = self.pending_load.as_mut() else {
            return;
        };
        match handle.progress() {
            LoadStatus::Pending => {}
            LoadStatus::Complete(media) => {
                self.pending_load = None;
                self.install(media);
                events.push(EngineEvent::Loaded {
                    duration: self.duration().unwrap_or(0.0),
                });
            }
            LoadStatus::Failed(error) => {
                self.pending_load = None;
                tracing::warn!(%error, "background load failed, keeping current media");
                events.push(EngineEvent::LoadFailed(error));
            }
            LoadStatus::Taken => self.pending_load = None,
        }
    }

    fn poll_exports(&mut self, events: &mut Vec<EngineEvent>) {
        let mut finished = Vec::new();
        for (id, handle) in self.clip_exports.iter_mut() {
            if let Some(result) = finished_export(handle) {
                finished.push((Some(*id), result));
            }
        }
        if let Some(handle) = self.bundle_export.as_mut() {
            if let Some(result) = finished_export(handle) {
                finished.push((None, result));
            }
        }

        for (clip, result) in finished {
            match clip {
                Some(id) => {
                    self.clip_exports.remove(&id);
                }
                None => self.bundle_export = None,
            }
            self.dirty = true;

            match result {
                Ok(named) => {
                    let outcome = self.delivery.deliver(&named);
                    if let DeliveryOutcome::Blocked { notice } = &outcome {
                        self.raise_notice(notice.clone());
                    }
                    events.push(EngineEvent::Delivered {
                        file_name: named.file_name,
                        outcome,
                    });
                }
                Err(error) => {
                    tracing::warn!(clip = ?clip.map(|c| c.0), %error, "export failed");
                    events.push(EngineEvent::ExportFailed { clip, error });
                }
            }
        }
    }

    /// Whether the next frame differs from the last one drawn.
    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.session.is_playing() || self.drag.pending_creation().is_some()
    }

    /// Draw the current state. The canvas is in device pixels; its width
    /// decides the envelope resolution.
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        let (columns, _) = canvas.size();
        {
            let envelope = match self.session.buffer() {
                Some(buffer) => Some(self.envelopes.get_or_compute(buffer, columns as usize)),
                None => None,
            };
            let scene = Scene {
                duration: self.session.duration(),
                envelope,
                regions: &self.regions,
                pending: self.drag.pending_creation(),
                playhead: self.session.position(),
                dpr: self.view.dpr,
            };
            render(&scene, &self.style, canvas);
        }
        self.dirty = false;
    }
}

/// `Some` once the job is over, with the file or the error message.
fn finished_export(handle: &mut ExportHandle) -> Option<std::result::Result<NamedBlob, String>> {
    match handle.progress() {
        ExportStatus::Pending | ExportStatus::Running(_) => None,
        ExportStatus::Complete(named) => Some(Ok(named)),
        ExportStatus::Failed(error) => Some(Err(error)),
        ExportStatus::Taken => Some(Err("export result already taken".to_string())),
    }
}
