//! CPAL audio output backend.

use crate::voice::Voice;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cropper_core::{Error as CoreError, PlaybackBackend, PlaybackRequest};
use parking_lot::Mutex;
use std::sync::Arc;

/// Wrapper to hold `cpal::Stream` in a `Send` context.
///
/// # Safety
/// `cpal::Stream` is `!Send` due to platform internals. The stream is only
/// created, kept and dropped by the thread that owns the `CpalBackend`,
/// which the session manager accesses through `&mut`.
struct StreamHandle(#[allow(dead_code)] cpal::Stream);

unsafe impl Send for StreamHandle {}

type SharedVoice = Arc<Mutex<Option<Voice>>>;

/// Plays requests on an output device. One stream per request; `stop`
/// drops the stream synchronously.
pub struct CpalBackend {
    device_index: Option<usize>,
    voice: SharedVoice,
    stream: Option<StreamHandle>,
}

impl CpalBackend {
    pub fn new(device_index: Option<usize>) -> crate::Result<Self> {
        // Fail early when there is no device at all.
        get_device(device_index)?;
        Ok(Self {
            device_index,
            voice: Arc::new(Mutex::new(None)),
            stream: None,
        })
    }

    pub fn list_devices() -> crate::Result<Vec<String>> {
        cpal::default_host()
            .output_devices()?
            .enumerate()
            .map(|(i, d)| {
                let name = d
                    .name()
                    .map_err(|e| crate::MediaError::AudioDevice(e.to_string()))?;
                Ok(format!("{i}: {name}"))
            })
            .collect()
    }

    fn open_stream(&mut self, request: PlaybackRequest) -> crate::Result<()> {
        let device = get_device(self.device_index)?;
        let config = device.default_output_config()?;
        let device_rate = config.sample_rate().0;

        *self.voice.lock() = Some(Voice::new(request, device_rate));

        let voice = self.voice.clone();
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), voice)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), voice)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), voice)?,
            format => {
                return Err(crate::MediaError::AudioDevice(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };
        stream.play()?;
        self.stream = Some(StreamHandle(stream));
        Ok(())
    }
}

impl PlaybackBackend for CpalBackend {
    fn start(&mut self, request: PlaybackRequest) -> cropper_core::Result<()> {
        self.stop();
        self.open_stream(request).map_err(|e| {
            self.voice.lock().take();
            CoreError::Backend(e.to_string())
        })
    }

    fn stop(&mut self) {
        self.stream = None;
        if let Some(mut voice) = self.voice.lock().take() {
            voice.cancel();
        }
    }
}

fn get_device(index: Option<usize>) -> crate::Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.output_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                crate::MediaError::AudioDevice(format!(
                    "Device index {i} out of range ({count} available)"
                ))
            })
        }
        None => host
            .default_output_device()
            .ok_or_else(|| crate::MediaError::AudioDevice("No output device available".into())),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    voice: SharedVoice,
) -> crate::Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut scratch = Vec::<f32>::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if scratch.len() < data.len() {
                scratch.resize(data.len(), 0.0);
            }
            let out = &mut scratch[..data.len()];
            out.fill(0.0);

            // Never block the audio thread; a contended frame plays silence.
            if let Some(mut guard) = voice.try_lock() {
                if let Some(voice) = guard.as_mut() {
                    voice.render(out, channels);
                }
            }

            for (sample, &value) in data.iter_mut().zip(out.iter()) {
                *sample = T::from_sample(value);
            }
        },
        |err| tracing::warn!(error = %err, "output stream error"),
        None,
    )?;

    Ok(stream)
}
