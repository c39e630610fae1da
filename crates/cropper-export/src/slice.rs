//! PCM extraction for a clip.

use cropper_core::{Clip, DecodedBuffer};

/// Planar samples for one clip at the source rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmSlice {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl PcmSlice {
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Frames `[floor(start * rate), floor(end * rate))` of `buffer`.
///
/// One channel is the unweighted mean of every source channel. Two channels
/// take source channels 0 and 1, with channel 0 duplicated for a mono
/// source. Frames past the end of the buffer read as silence.
pub fn slice_for_export(buffer: &DecodedBuffer, clip: &Clip, channels: u16) -> PcmSlice {
    let start = buffer.frame_at(clip.start);
    let end = buffer.frame_at(clip.end).max(start);
    let len = end - start;
    let source_channels = buffer.num_channels();

    // TODO: offer a weighted downmix next to the plain mean.
    let lanes = if channels <= 1 {
        let scale = 1.0 / source_channels.max(1) as f32;
        let mono = (start..end)
            .map(|frame| {
                (0..source_channels)
                    .map(|ch| buffer.sample(ch, frame))
                    .sum::<f32>()
                    * scale
            })
            .collect();
        vec![mono]
    } else {
        let right_source = if source_channels > 1 { 1 } else { 0 };
        let read = |ch: usize| -> Vec<f32> { (start..end).map(|f| buffer.sample(ch, f)).collect() };
        vec![read(0), read(right_source)]
    };

    debug_assert!(lanes.iter().all(|l| l.len() == len));
    PcmSlice {
        channels: lanes,
        sample_rate: buffer.sample_rate(),
    }
}
