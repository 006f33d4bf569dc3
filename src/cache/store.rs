//! Cache Store Module
//!
//! Response cache combining HashMap storage with FIFO eviction and lazy TTL expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, InsertionOrder};
use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};

/// Store handle shared by the fetcher, the prefetch queue and the prune task.
pub type SharedCache = Arc<RwLock<CacheStore>>;

// == Cache Store ==
/// Capacity-bounded response cache.
///
/// When full, the entry inserted earliest is evicted, regardless of how
/// recently it was read or how much lifetime it has left. Expired entries
/// keep occupying their slot until a read or [`CacheStore::prune`] finds them.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<CacheKey, CacheEntry>,
    order: InsertionOrder,
    stats: CacheStats,
    capacity: usize,
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
            default_ttl,
        }
    }

    /// Wraps the store into a handle that can be shared across tasks.
    pub fn shared(self) -> SharedCache {
        Arc::new(RwLock::new(self))
    }

    // == Set ==
    /// Stores a payload under `key` with `ttl`, or the default TTL if `None`.
    ///
    /// If the store is full, exactly one entry (the earliest inserted) is
    /// evicted first. Replacing a key that is still present keeps its place
    /// in the eviction order.
    pub fn set(&mut self, key: impl Into<CacheKey>, payload: Value, ttl: Option<Duration>) {
        let key = key.into();

        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!("Evicted oldest cache entry: {}", evicted);
            }
        }

        let entry = CacheEntry::new(payload, ttl.unwrap_or(self.default_ttl));
        self.order.record(&key);
        self.entries.insert(key, entry);

        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the payload stored under `key` if it has not expired.
    ///
    /// An expired entry is removed as a side effect. Reads never refresh the
    /// storage time. Counts a hit or a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let payload = self.lookup(key);
        match payload {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        payload
    }

    /// Like [`CacheStore::get`] but leaves the hit and miss counters alone.
    ///
    /// Used when the payload is only kept as a fallback and may never be
    /// served; call [`CacheStore::record_hit`] if it is.
    pub fn lookup(&mut self, key: &str) -> Option<Value> {
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => return Some(entry.payload.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            debug!("Cache entry expired on read: {}", key);
        }
        None
    }

    pub fn record_hit(&mut self) {
        self.stats.record_hit();
    }

    // == Clear ==
    /// Removes a single key; does nothing if it is absent.
    pub fn clear(&mut self, key: &str) {
        self.remove_entry(key);
    }

    /// Drops every entry.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Prune ==
    /// Removes every expired entry, read or not.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            self.remove_entry(&key);
        }

        self.stats.record_expirations(count);
        count
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Checks presence without applying expiry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn remove_entry(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
