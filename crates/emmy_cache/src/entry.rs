//! Cached values with their timestamps.

use derive_getters::Getters;
use std::time::Duration;
use tokio::time::Instant;

/// A resolved value held by the cache.
///
/// Timestamps use [`tokio::time::Instant`] so expiry follows a paused test clock.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    last_access: Instant,
}

impl<V> CacheEntry<V> {
    /// Create an entry stamped at `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
            last_access: now,
        }
    }

    /// Whether the entry has reached `ttl` at `now`.
    ///
    /// An entry is expired once its age equals or exceeds the TTL.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }

    /// Time left before expiry, or `None` once expired.
    pub fn time_remaining(&self, ttl: Duration, now: Instant) -> Option<Duration> {
        ttl.checked_sub(now.saturating_duration_since(self.inserted_at))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Record a read at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_access = now;
    }
}
