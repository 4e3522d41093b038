//! Time sources for gesture classification.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::util::lock;

/// Source of the timestamps used to classify clicks and drags.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Time is expressed as an offset from the instant the clock was created.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *lock(&self.offset) += by;
    }

    /// Moves the clock to `offset` past its origin. Going backwards is allowed.
    pub fn set(&self, offset: Duration) {
        *lock(&self.offset) = offset;
    }

    pub fn elapsed(&self) -> Duration {
        *lock(&self.offset)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *lock(&self.offset)
    }
}
