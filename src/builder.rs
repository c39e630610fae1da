//! Builder for configuring and constructing a `CropperEngine`.

use crate::engine::{CropperEngine, EngineParts, View};
use crate::Result;
use cropper_analysis::{EnvelopeCache, RenderStyle};
use cropper_core::{Arc, EditorConfig, NullBackend, PlaybackBackend, SystemClock, TransportClock};
use cropper_export::{ArchiveBuilder, EncoderFactory, ExportConfig, ExportPipeline};
use cropper_media::{ContainerDecoder, DeliveryChain, SymphoniaDecoder};

/// Every collaborator has a default, so `CropperEngine::builder().build()`
/// gives a working editor: Symphonia decoding, the default encoder, ZIP
/// bundling (feature `zip`), saving into the current directory and silent
/// playback. Enable `cpal-output` and call [`audio_output`] for sound.
///
/// # Example
///
/// ```ignore
/// use cropper::prelude::*;
///
/// let mut engine = CropperEngine::builder()
///     .config(EditorConfig { drag_threshold: 0.03, ..Default::default() })
///     .delivery(DeliveryChain::to_directory("exports"))
///     .build()?;
///
/// engine.load_file("take.wav")?;
/// ```
///
/// [`audio_output`]: CropperEngineBuilder::audio_output
pub struct CropperEngineBuilder {
    config: EditorConfig,
    export_config: ExportConfig,
    backend: Option<Box<dyn PlaybackBackend>>,
    clock: Option<Arc<dyn TransportClock>>,
    decoder: Option<Arc<dyn ContainerDecoder>>,
    encoder: Option<Arc<dyn EncoderFactory>>,
    export_format: Option<String>,
    archive: Option<Arc<dyn ArchiveBuilder>>,
    delivery: Option<DeliveryChain>,
    style: RenderStyle,
    envelope_cache: usize,
    view: View,

    #[cfg(feature = "cpal-output")]
    output_device: Option<Option<usize>>,
}

impl Default for CropperEngineBuilder {
    fn default() -> Self {
        Self {
            config: EditorConfig::default(),
            export_config: ExportConfig::default(),
            backend: None,
            clock: None,
            decoder: None,
            encoder: None,
            export_format: None,
            archive: None,
            delivery: None,
            style: RenderStyle::default(),
            envelope_cache: 8,
            view: View::default(),

            #[cfg(feature = "cpal-output")]
            output_device: None,
        }
    }
}

impl CropperEngineBuilder {
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn export_config(mut self, config: ExportConfig) -> Self {
        self.export_config = config;
        self
    }

    /// Overrides [`audio_output`](Self::audio_output) when both are set.
    pub fn backend(mut self, backend: impl PlaybackBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Play through a CPAL output device (`None` for the system default).
    #[cfg(feature = "cpal-output")]
    pub fn audio_output(mut self, device_index: Option<usize>) -> Self {
        self.output_device = Some(device_index);
        self
    }

    /// Shared by playback position and notice timeouts.
    pub fn clock(mut self, clock: Arc<dyn TransportClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn decoder(mut self, decoder: impl ContainerDecoder + 'static) -> Self {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    pub fn encoder(mut self, encoder: Arc<dyn EncoderFactory>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Pick a built-in encoder by extension (`flac`, `wav`). Unknown
    /// extensions fail in [`build`](Self::build). Ignored when
    /// [`encoder`](Self::encoder) is set.
    pub fn export_format(mut self, extension: impl Into<String>) -> Self {
        self.export_format = Some(extension.into());
        self
    }

    pub fn archive(mut self, archive: Arc<dyn ArchiveBuilder>) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn delivery(mut self, delivery: DeliveryChain) -> Self {
        self.delivery = Some(delivery);
        self
    }

    pub fn style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Envelopes kept for reuse across resizes. Default: 8
    pub fn envelope_cache(mut self, entries: usize) -> Self {
        self.envelope_cache = entries;
        self
    }

    /// Initial view size in CSS pixels and device-pixel ratio.
    pub fn view(mut self, width: f64, height: f64, dpr: f64) -> Self {
        self.view = View::new(width, height, dpr);
        self
    }

    pub fn build(self) -> Result<CropperEngine> {
        self.config.validate()?;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()) as Arc<dyn TransportClock>);

        #[allow(unused_mut)]
        let mut backend = self.backend;
        #[cfg(feature = "cpal-output")]
        if backend.is_none() {
            if let Some(device) = self.output_device {
                let output = cropper_media::CpalBackend::new(device)?;
                backend = Some(Box::new(output));
            }
        }
        let backend = backend.unwrap_or_else(|| Box::new(NullBackend::default()));

        let encoder = match (self.encoder, self.export_format.as_deref()) {
            (Some(encoder), _) => encoder,
            (None, Some(extension)) => cropper_export::encoder_for_extension(extension)?,
            (None, None) => cropper_export::default_encoder()?,
        };
        let mut pipeline = ExportPipeline::new(self.export_config, encoder)?;
        if let Some(archive) = self.archive.or_else(default_archive) {
            pipeline = pipeline.with_archive(archive);
        }

        let delivery = match self.delivery {
            Some(delivery) => delivery,
            None => DeliveryChain::to_directory(std::env::current_dir()?),
        };

        Ok(CropperEngine::from_parts(EngineParts {
            config: self.config,
            backend,
            clock,
            decoder: self
                .decoder
                .unwrap_or_else(|| Arc::new(SymphoniaDecoder) as Arc<dyn ContainerDecoder>),
            pipeline,
            delivery,
            envelopes: EnvelopeCache::new(self.envelope_cache),
            style: self.style,
            view: self.view,
        }))
    }
}

fn default_archive() -> Option<Arc<dyn ArchiveBuilder>> {
    #[cfg(feature = "zip")]
    return Some(Arc::new(cropper_export::ZipArchiveBuilder));
    #[cfg(not(feature = "zip"))]
    None
}
