//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the cache.
//!
//! # Tasks
//! - Prune: removes expired cache entries at a fixed interval

mod prune;

pub use prune::spawn_prune_task;
