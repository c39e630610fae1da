//! Handing finished files to the user.
//!
//! Delivery tries to save, falls back to opening the file with the system
//! handler, and finally reports a notice for the host to show. It never
//! returns an error to the caller.

use crate::error::Result;
use cropper_core::NamedBlob;
use std::path::{Path, PathBuf};

pub const BLOCKED_NOTICE: &str =
    "Downloads are blocked in this environment. Open in new tab and try again.";

pub trait SaveTarget: Send + Sync {
    /// Persist `file`; returns where it ended up.
    fn save(&self, file: &NamedBlob) -> Result<PathBuf>;
}

pub trait OpenTarget: Send + Sync {
    fn open(&self, file: &NamedBlob) -> Result<()>;
}

/// First free path for `name` in `dir`: `name`, then `stem (1).ext`, `stem (2).ext`, ...
fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    };
    (1u32..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Saves into a directory, never overwriting an existing file.
#[derive(Debug, Clone)]
pub struct DirectorySave {
    dir: PathBuf,
}

impl DirectorySave {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectorySave {
    fn save(&self, file: &NamedBlob) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = unique_path(&self.dir, &file.file_name);
        std::fs::write(&path, &file.blob.bytes)?;
        Ok(path)
    }
}

/// Stages the file in a scratch directory and opens it with the system handler.
#[derive(Debug, Clone)]
pub struct SystemOpener {
    staging: PathBuf,
}

impl SystemOpener {
    pub fn new(staging: impl Into<PathBuf>) -> Self {
        Self {
            staging: staging.into(),
        }
    }
}

impl Default for SystemOpener {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("cropper-open"))
    }
}

impl OpenTarget for SystemOpener {
    fn open(&self, file: &NamedBlob) -> Result<()> {
        let path = DirectorySave::new(&self.staging).save(file)?;
        webbrowser::open(&path.to_string_lossy())?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Saved(PathBuf),
    Opened,
    /// Nothing worked; show `notice` until dismissed or timed out.
    Blocked { notice: String },
}

#[derive(Default)]
pub struct DeliveryChain {
    save: Option<Box<dyn SaveTarget>>,
    open: Option<Box<dyn OpenTarget>>,
}

impl DeliveryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save into `dir`, falling back to the system opener.
    pub fn to_directory(dir: impl Into<PathBuf>) -> Self {
        Self::new()
            .with_save(DirectorySave::new(dir))
            .with_open(SystemOpener::default())
    }

    pub fn with_save(mut self, save: impl SaveTarget + 'static) -> Self {
        self.save = Some(Box::new(save));
        self
    }

    pub fn with_open(mut self, open: impl OpenTarget + 'static) -> Self {
        self.open = Some(Box::new(open));
        self
    }

    pub fn deliver(&self, file: &NamedBlob) -> DeliveryOutcome {
        if let Some(save) = &self.save {
            match save.save(file) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "file saved");
                    return DeliveryOutcome::Saved(path);
                }
                Err(e) => {
                    tracing::warn!(file = %file.file_name, error = %e, "save failed, trying to open instead")
                }
            }
        }

        if let Some(open) = &self.open {
            match open.open(file) {
                Ok(()) => return DeliveryOutcome::Opened,
                Err(e) => tracing::warn!(file = %file.file_name, error = %e, "open failed"),
            }
        }

        DeliveryOutcome::Blocked {
            notice: BLOCKED_NOTICE.to_string(),
        }
    }
}
