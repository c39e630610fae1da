//! Container decoding via Symphonia.
//!
//! Decodes a complete in-memory file into a planar [`DecodedBuffer`].

use crate::error::{MediaError, Result};
use cropper_core::{DecodedBuffer, InputFormat};
use std::io::{self, Cursor};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// A decoded file plus what the container told us about it.
#[derive(Debug)]
pub struct DecodedMedia {
    pub buffer: DecodedBuffer,
    pub format: InputFormat,
}

pub trait ContainerDecoder: Send + Sync {
    /// `extension` is a lowercase hint such as `"mp3"`; decoders may ignore it.
    fn decode(&self, bytes: Vec<u8>, extension: Option<&str>) -> Result<DecodedMedia>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl ContainerDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: Vec<u8>, extension: Option<&str>) -> Result<DecodedMedia> {
        let byte_len = bytes.len();
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(MediaError::NoAudioTrack)?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let mut decoder =
            symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

        let mut channels = codec_params.channels.map(|c| c.count());
        let mut sample_rate = codec_params.sample_rate;
        let mut samples: Vec<f32> = Vec::new();

        loop {
            match format.next_packet() {
                Ok(packet) => {
                    if packet.track_id() != track_id {
                        continue;
                    }
                    let decoded = match decoder.decode(&packet) {
                        Ok(buf) => buf,
                        Err(Error::DecodeError(e)) => {
                            tracing::debug!(error = e, "skipping undecodable packet");
                            continue;
                        }
                        Err(err) => return Err(err.into()),
                    };
                    let spec = *decoded.spec();
                    channels.get_or_insert(spec.channels.count());
                    sample_rate.get_or_insert(spec.rate);

                    let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    sample_buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(sample_buf.samples());
                }
                Err(Error::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(Error::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(Error::DecodeError(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        let channels = channels
            .filter(|&c| c > 0)
            .ok_or_else(|| MediaError::Decode("audio track missing channel info".into()))?;
        let sample_rate = sample_rate
            .filter(|&r| r > 0)
            .ok_or_else(|| MediaError::Decode("audio track missing sample rate".into()))?;

        let buffer = DecodedBuffer::from_interleaved(&samples, channels, sample_rate)?;
        let duration = buffer.duration();
        let bitrate_kbps = (duration > 0.0)
            .then(|| (byte_len as f64 * 8.0 / duration / 1000.0).round() as u32);

        tracing::debug!(
            channels,
            sample_rate,
            seconds = duration,
            frames = buffer.frames(),
            "symphonia audio decoded"
        );

        Ok(DecodedMedia {
            format: InputFormat {
                bitrate_kbps,
                ..buffer.input_format()
            },
            buffer,
        })
    }
}
