//! Memoization of decisive validation outcomes.
//!
//! The validator talks to the cache through [`ValidationCache`] so hosts can swap
//! in their own store and tests can control time via [`Clock`].

pub mod clock;
pub mod ttl;


use std::sync::Arc;
use std::time::Duration;

use crate::model::ValidationOutput;

#[cfg(any(test, feature = "mock"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use ttl::TtlCache;

/// Store for prior validation outputs.
///
/// Absence and expiry are both `None`; a miss is never an error.
pub trait ValidationCache: Send + Sync {
    fn get(&self, key: u64) -> Option<ValidationOutput>;

    /// Stores `value` for `ttl`. Implementations must not retain non-decisive values.
    fn set(&self, key: u64, value: ValidationOutput, ttl: Duration);
}

impl<T: ValidationCache + ?Sized> ValidationCache for Arc<T> {
    fn get(&self, key: u64) -> Option<ValidationOutput> {
        (**self).get(key)
    }

    fn set(&self, key: u64, value: ValidationOutput, ttl: Duration) {
        (**self).set(key, value, ttl)
    }
}
