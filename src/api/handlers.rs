//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::cache::{CacheStore, SharedCache};
use crate::config::Config;
use crate::error::{ApiError, FetchError, Result};
use crate::fetch::{CachedFetcher, CachedResponse};
use crate::models::{
    ClearEntryQuery, ClearResponse, FetchRequest, HealthResponse, PrefetchResponse,
    PruneResponse, StatsResponse,
};
use crate::prefetch::{adjacent_months, calendar_url, PrefetchQueue};

/// Application state shared across all handlers.
///
/// The store, the fetcher and the prefetch queue are built once at startup;
/// every handler sees the same instances.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
    pub fetcher: CachedFetcher,
    pub prefetch: PrefetchQueue,
}

impl AppState {
    /// Wires a state around an existing fetcher and its store.
    pub fn new(fetcher: CachedFetcher, prefetch: PrefetchQueue) -> Self {
        Self {
            cache: fetcher.cache().clone(),
            fetcher,
            prefetch,
        }
    }

    /// Builds the store, fetcher and queue from configuration.
    pub fn from_config(config: &Config) -> std::result::Result<Self, FetchError> {
        let cache = CacheStore::new(config.max_entries, config.default_ttl()).shared();
        let fetcher = CachedFetcher::from_config(config, cache)?;
        let prefetch = PrefetchQueue::new(fetcher.clone(), config.prefetch_delay());
        Ok(Self::new(fetcher, prefetch))
    }
}

/// Handler for POST /fetch
///
/// Runs a cached fetch and returns the payload with its cache flags.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Json(req): Json<FetchRequest>,
) -> Result<Json<CachedResponse<Value>>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let response = state.fetcher.fetch(&req.url, &req.options()).await?;
    Ok(Json(response))
}

/// Handler for POST /prefetch
///
/// Enqueues a speculative fetch and returns immediately. URLs the fetcher
/// would refuse are rejected here, since the queue drops failures silently.
pub async fn prefetch_handler(
    State(state): State<AppState>,
    Json(req): Json<FetchRequest>,
) -> Result<(StatusCode, Json<PrefetchResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }
    state.fetcher.resolve(&req.url)?;

    let pending = state.prefetch.add(req.url.clone(), req.options());

    Ok((
        StatusCode::ACCEPTED,
        Json(PrefetchResponse {
            queued: vec![req.url],
            pending,
        }),
    ))
}

/// Handler for POST /prefetch/calendar/:year/:month
///
/// Warms the cache with the months around the one being viewed.
pub async fn prefetch_calendar_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<(StatusCode, Json<PrefetchResponse>)> {
    let months = adjacent_months(year, month)
        .ok_or_else(|| ApiError::InvalidRequest(format!("Invalid month: {}/{}", year, month)))?;
    let pending = state
        .prefetch
        .prefetch_adjacent_months(year, month)
        .unwrap_or_default();

    Ok((
        StatusCode::ACCEPTED,
        Json(PrefetchResponse {
            queued: months.iter().map(|&(y, m)| calendar_url(y, m)).collect(),
            pending,
        }),
    ))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(&cache.stats(), cache.capacity()))
}

/// Handler for POST /cache/prune
///
/// Runs an expiry sweep now instead of waiting for the prune task.
pub async fn prune_handler(State(state): State<AppState>) -> Json<PruneResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.prune();

    Json(PruneResponse {
        removed,
        remaining: cache.len(),
    })
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    cache.clear_all();

    Json(ClearResponse::new("Cache cleared", cache.len()))
}

/// Handler for DELETE /cache/entry?key=...
///
/// Clearing a key that is not cached is not an error.
pub async fn clear_entry_handler(
    State(state): State<AppState>,
    Query(query): Query<ClearEntryQuery>,
) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    cache.clear(&query.key);

    Json(ClearResponse::new(
        format!("Key '{}' cleared", query.key),
        cache.len(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
