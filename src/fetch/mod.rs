//! Fetch Module
//!
//! Cached JSON fetching: cache-first reads, write-on-success and stale
//! fallback when the network fails.

mod client;
mod options;
mod response;

pub use client::{build_client, CachedFetcher, DEFAULT_MAX_BODY_BYTES};
pub use options::{FetchOptions, RequestOptions};
pub use response::CachedResponse;
