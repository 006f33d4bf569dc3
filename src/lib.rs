//! Hotel Cache - client-side response cache for the hotel management API
//!
//! Provides a TTL response cache with stale-on-error fallback and a
//! serialized background prefetch queue.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod prefetch;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheKey, CacheStore, SharedCache};
pub use config::Config;
pub use error::FetchError;
pub use fetch::{CachedFetcher, CachedResponse, FetchOptions};
pub use prefetch::PrefetchQueue;
pub use tasks::spawn_prune_task;
