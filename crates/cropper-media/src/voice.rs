//! Pull-style renderer for one playback request.

use cropper_core::{CompletionToken, DecodedBuffer, PlaybackRequest};
use std::sync::Arc;

/// Reads a buffer region at the device rate, with linear interpolation.
///
/// Device channels 0 and 1 map to source channels 0 and 1 (a mono source
/// feeds both); further device channels are silent. When the region is
/// exhausted the completion token fires once.
pub struct Voice {
    buffer: Arc<DecodedBuffer>,
    /// Read position in source frames.
    position: f64,
    end: f64,
    /// Source frames per device frame.
    step: f64,
    completion: Option<CompletionToken>,
}

impl Voice {
    pub fn new(request: PlaybackRequest, device_rate: u32) -> Self {
        let rate = request.buffer.sample_rate() as f64;
        let frames = request.buffer.frames() as f64;
        let start = (request.offset.max(0.0) * rate).min(frames);
        let end = match request.duration {
            Some(d) => (start + d.max(0.0) * rate).min(frames),
            None => frames,
        };
        Self {
            step: rate / device_rate.max(1) as f64,
            buffer: request.buffer,
            position: start,
            end,
            completion: Some(request.completion),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.completion.is_none()
    }

    fn read(&self, channel: usize, position: f64) -> f32 {
        let index = position.floor();
        let frac = (position - index) as f32;
        let i = index as usize;
        let a = self.buffer.sample(channel, i);
        let b = if ((i + 1) as f64) < self.end {
            self.buffer.sample(channel, i + 1)
        } else {
            a
        };
        a + (b - a) * frac
    }

    /// Fill interleaved `out` with `channels` channels.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let last_source = self.buffer.num_channels().saturating_sub(1);

        for frame in out.chunks_mut(channels) {
            if self.position >= self.end {
                frame.fill(0.0);
                continue;
            }
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = if ch < 2 {
                    self.read(ch.min(last_source), self.position)
                } else {
                    0.0
                };
            }
            self.position += self.step;
        }

        if self.position >= self.end {
            if let Some(token) = self.completion.take() {
                token.complete();
            }
        }
    }

    /// Drop the completion token without firing it.
    pub fn cancel(&mut self) {
        self.completion = None;
        self.position = self.end;
    }
}
