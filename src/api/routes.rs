//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_entry_handler, fetch_handler, health_handler,
    prefetch_calendar_handler, prefetch_handler, prune_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: the hotel UI is served from another origin
/// - Tracing: logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/fetch", post(fetch_handler))
        .route("/prefetch", post(prefetch_handler))
        .route(
            "/prefetch/calendar/:year/:month",
            post(prefetch_calendar_handler),
        )
        .route("/cache", delete(clear_all_handler))
        .route("/cache/entry", delete(clear_entry_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/prune", post(prune_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
