//! Mock hotel API used by the integration tests.
//!
//! Records every request it receives and how many were in flight at once.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use hotel_cache::{CacheStore, CachedFetcher, SharedCache};
use reqwest::{Client, Url};
use serde_json::json;
use tokio::time::Instant;

/// Simulated latency of calendar and slow endpoints
pub const CALENDAR_LATENCY: Duration = Duration::from_millis(30);

/// Size of the `/big` payload's blob field
pub const BIG_BODY_LEN: usize = 64 * 1024;

#[derive(Clone, Default)]
pub struct Upstream {
    requests: Arc<Mutex<Vec<(String, Instant)>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    toggle_latency_ms: Arc<AtomicU64>,
    counter: Arc<AtomicUsize>,
}

impl Upstream {
    /// Paths requested so far, in arrival order.
    pub fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn arrivals(&self) -> Vec<Instant> {
        self.requests.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.paths().iter().filter(|p| p.as_str() == path).count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Makes `/toggle` answer 503 while set.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every `/toggle` answer, failing or not.
    pub fn set_toggle_latency(&self, latency: Duration) {
        self.toggle_latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }
}

/// Starts the mock API on an ephemeral port and returns its base URL.
pub async fn spawn_upstream() -> (Url, Upstream) {
    let upstream = Upstream::default();
    let app = Router::new().fallback(handle).with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = Url::parse(&format!("http://{}", addr)).unwrap();
    (base, upstream)
}

/// Base URL of a port nothing listens on.
pub async fn closed_port_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}", addr)).unwrap()
}

pub fn fetcher_for(base: Url, cache: SharedCache) -> CachedFetcher {
    CachedFetcher::new(Client::new(), cache).with_base_url(base)
}

pub fn new_cache() -> SharedCache {
    CacheStore::new(50, Duration::from_secs(300)).shared()
}

async fn handle(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    upstream
        .requests
        .lock()
        .unwrap()
        .push((path.clone(), Instant::now()));

    let current = upstream.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    upstream.max_in_flight.fetch_max(current, Ordering::SeqCst);

    let response = respond(&upstream, &method, &path, &headers, body).await;

    upstream.in_flight.fetch_sub(1, Ordering::SeqCst);
    response
}

async fn respond(
    upstream: &Upstream,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: String,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    match path {
        "/x" => Json(json!({"y": 2})).into_response(),
        "/api/system/status" => Json(json!({
            "server_status": "online",
            "database_status": "online",
            "data_status": "warning"
        }))
        .into_response(),
        "/fail" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "/garbage" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "/headers" => Json(json!({
            "accept": header("accept"),
            "cache_control": header("cache-control"),
            "x_hotel": header("x-hotel"),
        }))
        .into_response(),
        "/echo" => Json(json!({"method": method.as_str(), "body": body})).into_response(),
        "/toggle" => {
            let latency = upstream.toggle_latency_ms.load(Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(latency)).await;
            if upstream.failing.load(Ordering::SeqCst) {
                (StatusCode::SERVICE_UNAVAILABLE, "down").into_response()
            } else {
                let n = upstream.counter.fetch_add(1, Ordering::SeqCst);
                Json(json!({"version": n})).into_response()
            }
        }
        "/big" => Json(json!({"blob": "a".repeat(BIG_BODY_LEN)})).into_response(),
        "/slow" => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({"slow": true})).into_response()
        }
        p if p.starts_with("/api/calendar/") => {
            tokio::time::sleep(CALENDAR_LATENCY).await;
            Json(json!({"calendar_data": {}, "path": p})).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
