//! Bundling several encoded clips into one archive.

use crate::error::Result;
use cropper_core::{EncodedBlob, NamedBlob};

pub trait ArchiveBuilder: Send + Sync {
    /// Entries are written in the order given.
    fn build(&self, entries: &[NamedBlob]) -> Result<EncodedBlob>;

    fn extension(&self) -> &'static str;
}

/// ZIP archive with stored (uncompressed) entries; encoded audio does not
/// shrink under deflate.
#[cfg(feature = "zip")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveBuilder;

#[cfg(feature = "zip")]
impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(&self, entries: &[NamedBlob]) -> Result<EncodedBlob> {
        use std::io::{Cursor, Write};
        use zip::write::FileOptions;
        use zip::{CompressionMethod, ZipWriter};

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        for entry in entries {
            writer.start_file(entry.file_name.as_str(), options)?;
            writer.write_all(&entry.blob.bytes)?;
        }

        let cursor = writer.finish()?;
        Ok(EncodedBlob::new(
            cursor.into_inner(),
            "application/zip",
            "zip",
        ))
    }

    fn extension(&self) -> &'static str {
        "zip"
    }
}
