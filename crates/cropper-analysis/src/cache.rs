//! LRU cache of column envelopes, keyed by buffer and column count.

use crate::waveform::{column_summary, WaveformSummary};
use cropper_core::{BufferId, DecodedBuffer};
use lru::LruCache;
use std::num::NonZeroUsize;

const MIN_ENTRIES: NonZeroUsize = NonZeroUsize::MIN;

pub struct EnvelopeCache {
    entries: LruCache<(BufferId, usize), WaveformSummary>,
}

impl EnvelopeCache {
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(MIN_ENTRIES);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Envelope for `buffer` at `columns` device pixels, computed on a miss.
    pub fn get_or_compute(&mut self, buffer: &DecodedBuffer, columns: usize) -> &WaveformSummary {
        self.entries
            .get_or_insert((buffer.id(), columns), || column_summary(buffer, columns))
    }

    pub fn contains(&self, buffer: &DecodedBuffer, columns: usize) -> bool {
        self.entries.contains(&(buffer.id(), columns))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EnvelopeCache {
    fn default() -> Self {
        Self::new(8)
    }
}
