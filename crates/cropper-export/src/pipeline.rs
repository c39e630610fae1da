//! Clip export: slice, resample, convert and encode.

use crate::archive::ArchiveBuilder;
use crate::config::ExportConfig;
use crate::dsp::resample;
use crate::encoder::{EncodeSpec, EncoderFactory};
use crate::error::{ExportError, Result};
use crate::naming::{archive_filename, clip_filename};
use crate::pcm::to_i16;
use crate::rate::select_encode_rate;
use crate::slice::slice_for_export;
use cropper_core::{order_clips, Clip, DecodedBuffer, EncodedBlob, InputFormat, NamedBlob};
use std::sync::Arc;

/// Progress of a multi-clip export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    pub completed: usize,
    pub total: usize,
}

#[derive(Clone)]
pub struct ExportPipeline {
    config: ExportConfig,
    encoder: Arc<dyn EncoderFactory>,
    archive: Option<Arc<dyn ArchiveBuilder>>,
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("config", &self.config)
            .field("extension", &self.encoder.extension())
            .field("archive", &self.archive.as_ref().map(|a| a.extension()))
            .finish()
    }
}

impl ExportPipeline {
    pub fn new(config: ExportConfig, encoder: Arc<dyn EncoderFactory>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            encoder,
            archive: None,
        })
    }

    /// Default encoder, and a ZIP archive builder when compiled in.
    pub fn with_defaults(config: ExportConfig) -> Result<Self> {
        let pipeline = Self::new(config, crate::format::default_encoder()?)?;
        #[cfg(feature = "zip")]
        let pipeline = pipeline.with_archive(Arc::new(crate::archive::ZipArchiveBuilder));
        Ok(pipeline)
    }

    pub fn with_archive(mut self, archive: Arc<dyn ArchiveBuilder>) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn extension(&self) -> &'static str {
        self.encoder.extension()
    }

    pub fn has_archive(&self) -> bool {
        self.archive.is_some()
    }

    /// Encode one clip.
    ///
    /// Channel count follows `format` (clamped to 1..=2). The clip is sliced
    /// at the buffer's rate, resampled to the nearest supported encoder rate
    /// and fed to the encoder in `block_size` frame blocks.
    pub fn export_clip(
        &self,
        buffer: &DecodedBuffer,
        format: InputFormat,
        clip: &Clip,
    ) -> Result<EncodedBlob> {
        let channels = format.channels.clamp(1, 2);
        let slice = slice_for_export(buffer, clip, channels);
        let target_rate = select_encode_rate(slice.sample_rate, &self.config.supported_rates);

        let planar = resample(
            &slice.channels,
            slice.sample_rate,
            target_rate,
            self.config.resample_quality,
        )?;
        let pcm: Vec<Vec<i16>> = planar.iter().map(|c| to_i16(c)).collect();

        let spec = EncodeSpec {
            channels,
            sample_rate: target_rate,
            bitrate_kbps: self.config.bitrate_for(format.bitrate_kbps),
        };
        tracing::debug!(
            clip = clip.id.0,
            frames = pcm.first().map_or(0, Vec::len),
            source_rate = slice.sample_rate,
            target_rate,
            channels,
            "encoding clip"
        );

        let mut encoder = self.encoder.create(spec)?;
        let frames = pcm.first().map_or(0, Vec::len);
        let mut bytes = Vec::new();
        let mut pos = 0;
        while pos < frames {
            let end = (pos + self.config.block_size).min(frames);
            let block: Vec<&[i16]> = pcm.iter().map(|c| &c[pos..end]).collect();
            bytes.extend(encoder.encode_block(&block)?);
            pos = end;
        }
        bytes.extend(encoder.flush()?);

        Ok(EncodedBlob::new(
            bytes,
            self.encoder.mime(),
            self.encoder.extension(),
        ))
    }

    /// Encode one clip and name it with its positional `number`.
    pub fn export_clip_named(
        &self,
        buffer: &DecodedBuffer,
        format: InputFormat,
        clip: &Clip,
        number: usize,
        base: &str,
    ) -> Result<NamedBlob> {
        let blob = self.export_clip(buffer, format, clip)?;
        Ok(NamedBlob {
            file_name: clip_filename(base, number, clip.start, clip.end, blob.extension),
            blob,
        })
    }

    /// Encode every clip in display order and bundle them into one archive.
    pub fn export_all(
        &self,
        buffer: &DecodedBuffer,
        format: InputFormat,
        clips: &[Clip],
        base: &str,
    ) -> Result<NamedBlob> {
        self.export_all_with_progress(buffer, format, clips, base, &mut |_: ExportProgress| {})
    }

    pub fn export_all_with_progress(
        &self,
        buffer: &DecodedBuffer,
        format: InputFormat,
        clips: &[Clip],
        base: &str,
        on_progress: &mut dyn FnMut(ExportProgress),
    ) -> Result<NamedBlob> {
        let archive = self
            .archive
            .as_ref()
            .ok_or_else(|| ExportError::UnsupportedFormat("no archive builder configured".into()))?;
        if clips.is_empty() {
            return Err(ExportError::InvalidData("no clips to export".into()));
        }

        let ordered = order_clips(clips);
        let total = ordered.len();
        tracing::info!(clips = total, base, "exporting all clips");

        let mut entries = Vec::with_capacity(total);
        for (index, clip) in ordered.into_iter().enumerate() {
            on_progress(ExportProgress {
                completed: index,
                total,
            });
            entries.push(self.export_clip_named(buffer, format, clip, index + 1, base)?);
        }
        on_progress(ExportProgress {
            completed: total,
            total,
        });

        let blob = archive.build(&entries)?;
        Ok(NamedBlob {
            file_name: archive_filename(base, archive.extension()),
            blob,
        })
    }
}
