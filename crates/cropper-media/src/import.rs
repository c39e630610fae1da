//! File loading, blocking or on a background thread with status polling.

use crate::decode::ContainerDecoder;
use crate::error::{MediaError, Result};
use cropper_core::{DecodedBuffer, InputFormat};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Where the media comes from.
#[derive(Debug, Clone)]
pub enum LoadSource {
    Path(PathBuf),
    /// Already-read bytes, e.g. from a drop target. `name` supplies the
    /// extension hint and the export base name.
    Bytes { name: Option<String>, bytes: Vec<u8> },
}

impl LoadSource {
    pub fn file_name(&self) -> Option<String> {
        match self {
            LoadSource::Path(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string),
            LoadSource::Bytes { name, .. } => name.clone(),
        }
    }
}

/// A successfully decoded file, ready to install in the editor.
#[derive(Debug, Clone)]
pub struct LoadedMedia {
    pub buffer: Arc<DecodedBuffer>,
    pub format: InputFormat,
    pub file_name: Option<String>,
}

fn extension_of(name: &str) -> Option<String> {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => Some(name[idx + 1..].to_ascii_lowercase()),
        _ => None,
    }
}

/// Read and decode `source`.
pub fn load(decoder: &dyn ContainerDecoder, source: LoadSource) -> Result<LoadedMedia> {
    let file_name = source.file_name();
    let bytes = match source {
        LoadSource::Path(path) => std::fs::read(&path)?,
        LoadSource::Bytes { bytes, .. } => bytes,
    };
    let extension = file_name.as_deref().and_then(extension_of);

    let media = decoder.decode(bytes, extension.as_deref())?;
    tracing::info!(
        file = file_name.as_deref().unwrap_or("<unnamed>"),
        channels = media.buffer.num_channels(),
        sample_rate = media.buffer.sample_rate(),
        seconds = media.buffer.duration(),
        "media loaded"
    );

    Ok(LoadedMedia {
        buffer: Arc::new(media.buffer),
        format: media.format,
        file_name,
    })
}

pub enum LoadStatus {
    Pending,
    Complete(LoadedMedia),
    Failed(String),
    /// The outcome was returned by an earlier poll.
    Taken,
}

/// Handle to a background load. Poll with [`progress()`] each frame.
///
/// [`progress()`]: LoadHandle::progress
pub struct LoadHandle {
    thread: Option<JoinHandle<Result<LoadedMedia>>>,
}

impl LoadHandle {
    /// Start decoding on a dedicated thread.
    pub fn start(decoder: Arc<dyn ContainerDecoder>, source: LoadSource) -> Result<Self> {
        let thread = std::thread::Builder::new()
            .name("cropper-load".into())
            .spawn(move || load(decoder.as_ref(), source))?;
        Ok(Self {
            thread: Some(thread),
        })
    }

    /// Non-blocking.
    pub fn progress(&mut self) -> LoadStatus {
        let finished = match self.thread.as_ref() {
            Some(thread) => thread.is_finished(),
            None => return LoadStatus::Taken,
        };
        if finished {
            if let Some(thread) = self.thread.take() {
                return match join(thread) {
                    Ok(media) => LoadStatus::Complete(media),
                    Err(e) => LoadStatus::Failed(e.to_string()),
                };
            }
        }
        LoadStatus::Pending
    }

    pub fn wait(mut self) -> Result<LoadedMedia> {
        match self.thread.take() {
            Some(thread) => join(thread),
            None => Err(MediaError::Worker("load already consumed".into())),
        }
    }

    pub fn is_done(&self) -> bool {
        self.thread
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(true)
    }
}

fn join(thread: JoinHandle<Result<LoadedMedia>>) -> Result<LoadedMedia> {
    thread
        .join()
        .unwrap_or_else(|_| Err(MediaError::Worker("load thread panicked".into())))
}
