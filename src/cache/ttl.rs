//! In-memory decision cache with per-entry TTL.
//!
//! Expiry is lazy: an entry past its deadline is invalidated by the `get` that
//! observes it. Nothing sweeps in the background; the optional capacity bound is
//! the only other eviction.

use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::ValidationCache;
use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::model::ValidationOutput;

#[derive(Debug, Clone)]
struct CachedDecision {
    value: ValidationOutput,
    expires_at: u64,
}

/// TTL cache keyed by [`crate::hashing::validation_key`].
pub struct TtlCache<C: Clock = SystemClock> {
    entries: Cache<u64, CachedDecision>,
    clock: C,
}

impl TtlCache<SystemClock> {
    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache holding at most `capacity` decisions.
    pub fn with_capacity(capacity: u64) -> Self {
        Self::with_clock(capacity, SystemClock::new())
    }
}

impl<C: Clock> TtlCache<C> {
    pub fn with_clock(capacity: u64, clock: C) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            clock,
        }
    }

    /// Looks up a live entry, invalidating it if expired.
    pub fn lookup(&self, key: u64) -> Option<ValidationOutput> {
        let entry = self.entries.get(&key)?;
        if self.clock.now_millis() >= entry.expires_at {
            debug!(key = key, "cache entry expired");
            self.entries.invalidate(&key);
            return None;
        }
        Some(entry.value)
    }

    /// Stores a decisive value; returns `false` if the value was refused.
    pub fn insert(&self, key: u64, value: ValidationOutput, ttl: Duration) -> bool {
        if !value.is_decisive() {
            debug!(
                key = key,
                verdict = %value.verdict,
                confidence = value.confidence,
                "refusing to cache non-decisive outcome"
            );
            return false;
        }

        let expires_at = self
            .clock
            .now_millis()
            .saturating_add(ttl.as_millis() as u64);
        self.entries.insert(key, CachedDecision { value, expires_at });
        true
    }

    pub fn remove(&self, key: u64) {
        self.entries.invalidate(&key);
    }

    /// Number of stored entries, including expired ones not yet observed.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for TtlCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> std::fmt::Debug for TtlCache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl<C: Clock> ValidationCache for TtlCache<C> {
    fn get(&self, key: u64) -> Option<ValidationOutput> {
        self.lookup(key)
    }

    fn set(&self, key: u64, value: ValidationOutput, ttl: Duration) {
        self.insert(key, value, ttl);
    }
}
