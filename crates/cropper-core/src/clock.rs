//! Transport clocks: monotonic seconds since an arbitrary origin.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

pub trait TransportClock: Send + Sync {
    /// Seconds since the clock's origin. Never decreases.
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportClock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        let mut now = self.now.lock();
        *now += seconds.max(0.0);
    }

    pub fn set(&self, seconds: f64) {
        let mut now = self.now.lock();
        *now = now.max(seconds);
    }
}

impl TransportClock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}
