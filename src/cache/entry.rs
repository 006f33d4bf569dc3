//! Cache Entry Module
//!
//! Defines the structure for individual cached responses with TTL support.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

// == Cache Entry ==
/// A decoded response payload together with its storage time and lifetime.
///
/// Entries are never mutated after insertion; storing the same key again
/// replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The decoded response body
    pub payload: Value,
    /// When the entry was stored
    pub stored_at: Instant,
    /// How long the entry stays valid
    pub ttl: Duration,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stored now.
    pub fn new(payload: Value, ttl: Duration) -> Self {
        Self {
            payload,
            stored_at: Instant::now(),
            ttl,
        }
    }

    // == Age ==
    /// Time elapsed between storage and `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    // == Is Expired ==
    /// Checks whether the entry had expired at `now`.
    ///
    /// Expiry is strict: an entry whose age equals its TTL is still valid.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.age_at(now) > self.ttl
    }

    /// Checks whether the entry has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Remaining lifetime, or zero once the TTL has elapsed.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.age_at(Instant::now()))
    }
}
