//! Time source for cache expiry.

use std::time::Instant;

#[cfg(any(test, feature = "mock"))]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(any(test, feature = "mock"))]
use std::time::Duration;

/// Monotonic millisecond clock.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall-time clock measured from construction.
#[derive(Debug, Clone, Copy)]
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

impl Clock for SystemClock {
    #[inline]
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for deterministic expiry tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

#[cfg(any(test, feature = "mock"))]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "mock"))]
impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    #[inline]
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}
