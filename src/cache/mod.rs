//! Cache Module
//!
//! In-memory response cache with TTL expiry and FIFO eviction.

mod entry;
mod key;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::time::Duration;

// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::{CacheStore, SharedCache};

// == Public Constants ==
/// Default maximum number of cached responses
pub const DEFAULT_CAPACITY: usize = 50;

/// Default lifetime of a cached response
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default interval between expiry sweeps
pub const DEFAULT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);
