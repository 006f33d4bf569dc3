//! API Module
//!
//! HTTP handlers and routing for the cache service.
//!
//! # Endpoints
//! - `POST /fetch` - Cached fetch of an upstream JSON resource
//! - `POST /prefetch` - Enqueue a speculative fetch
//! - `POST /prefetch/calendar/:year/:month` - Prefetch the adjacent months
//! - `GET /cache/stats` - Cache statistics
//! - `POST /cache/prune` - Sweep expired entries now
//! - `DELETE /cache` - Drop every entry
//! - `DELETE /cache/entry?key=` - Drop one entry
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
