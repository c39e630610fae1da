//! Non-blocking export handle with progress polling.

use crate::error::{ExportError, Result};
use crate::pipeline::{ExportPipeline, ExportProgress};
use crossbeam_channel::{unbounded, Receiver};
use cropper_core::{Clip, DecodedBuffer, InputFormat, NamedBlob};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Status of a background export operation.
#[derive(Debug)]
pub enum ExportStatus {
    /// No progress yet (just started).
    Pending,
    /// Export is in progress.
    Running(ExportProgress),
    /// Export completed; the blob is handed over exactly once.
    Complete(NamedBlob),
    /// Export failed with an error message.
    Failed(String),
    /// The outcome was returned by an earlier poll.
    Taken,
}

/// What a background job exports.
#[derive(Debug, Clone)]
pub enum ExportJob {
    Clip { clip: Clip, number: usize },
    All { clips: Vec<Clip> },
}

/// Handle to a background export operation.
///
/// The worker gets its own snapshot of the buffer and clips, so edits made
/// while it runs do not affect the output. Poll with [`progress()`] each frame.
///
/// [`progress()`]: ExportHandle::progress
pub struct ExportHandle {
    progress_rx: Receiver<ExportProgress>,
    thread: Option<JoinHandle<Result<NamedBlob>>>,
    last_progress: Option<ExportProgress>,
}

impl ExportHandle {
    pub fn spawn(
        pipeline: ExportPipeline,
        buffer: Arc<DecodedBuffer>,
        format: InputFormat,
        job: ExportJob,
        base: String,
    ) -> Result<Self> {
        let (progress_tx, progress_rx) = unbounded();

        let thread = std::thread::Builder::new()
            .name("cropper-export".into())
            .spawn(move || {
                let result = match job {
                    ExportJob::Clip { clip, number } => {
                        let _ = progress_tx.send(ExportProgress {
                            completed: 0,
                            total: 1,
                        });
                        pipeline.export_clip_named(&buffer, format, &clip, number, &base)
                    }
                    ExportJob::All { clips } => pipeline.export_all_with_progress(
                        &buffer,
                        format,
                        &clips,
                        &base,
                        &mut |p: ExportProgress| {
                            let _ = progress_tx.send(p);
                        },
                    ),
                };
                match &result {
                    Ok(named) => tracing::info!(
                        file = %named.file_name,
                        bytes = named.blob.len(),
                        "export finished"
                    ),
                    Err(e) => tracing::warn!(error = %e, "export failed"),
                }
                result
            })?;

        Ok(Self {
            progress_rx,
            thread: Some(thread),
            last_progress: None,
        })
    }

    /// Poll for the latest export progress (non-blocking).
    ///
    /// Drains all pending progress messages and returns the latest one.
    /// Once the worker has finished, the first call returns `Complete` or
    /// `Failed` and later calls return `Taken`.
    pub fn progress(&mut self) -> ExportStatus {
        while let Ok(p) = self.progress_rx.try_recv() {
            self.last_progress = Some(p);
        }

        let finished = match self.thread.as_ref() {
            Some(thread) => thread.is_finished(),
            None => return ExportStatus::Taken,
        };
        if finished {
            if let Some(thread) = self.thread.take() {
                return match join(thread) {
                    Ok(named) => ExportStatus::Complete(named),
                    Err(e) => ExportStatus::Failed(e.to_string()),
                };
            }
        }

        match self.last_progress {
            Some(p) => ExportStatus::Running(p),
            None => ExportStatus::Pending,
        }
    }

    /// Block until the export finishes and return the result.
    pub fn wait(mut self) -> Result<NamedBlob> {
        match self.thread.take() {
            Some(thread) => join(thread),
            None => Err(ExportError::Worker("result already taken".into())),
        }
    }

    /// Check if the export has finished (non-blocking).
    pub fn is_done(&self) -> bool {
        self.thread
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(true)
    }
}

fn join(thread: JoinHandle<Result<NamedBlob>>) -> Result<NamedBlob> {
    thread
        .join()
        .unwrap_or_else(|_| Err(ExportError::Worker("export thread panicked".into())))
}
