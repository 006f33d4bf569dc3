//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Current number of entries, expired-but-unswept included
    pub total_entries: usize,
    pub capacity: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for `POST /prefetch` and the calendar prefetch route
#[derive(Debug, Clone, Serialize)]
pub struct PrefetchResponse {
    /// URLs that were enqueued by this call
    pub queued: Vec<String>,
    /// Backlog length right after enqueueing
    pub pending: usize,
}

/// Response body for `POST /cache/prune`
#[derive(Debug, Clone, Serialize)]
pub struct PruneResponse {
    pub removed: usize,
    pub remaining: usize,
}

/// Response body for the cache clearing routes
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub remaining: usize,
}

impl ClearResponse {
    pub fn new(message: impl Into<String>, remaining: usize) -> Self {
        Self {
            message: message.into(),
            remaining,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
