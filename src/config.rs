//! Configuration Module
//!
//! Loads cache, fetch and server settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached responses
    pub max_entries: usize,
    /// Default TTL in seconds for cached responses
    pub default_ttl: u64,
    /// Interval in seconds between expiry sweeps
    pub prune_interval: u64,
    /// Pause in milliseconds between two prefetch requests
    pub prefetch_delay_ms: u64,
    /// Upstream request timeout in seconds
    pub request_timeout: u64,
    /// Largest upstream response body accepted, in bytes
    pub max_body_bytes: usize,
    /// Base URL that relative request URLs are resolved against; other origins are refused
    pub upstream_url: String,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cached responses (default: 50)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `PRUNE_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `PREFETCH_DELAY_MS` - Delay between prefetches in ms (default: 100)
    /// - `REQUEST_TIMEOUT` - Upstream timeout in seconds (default: 30)
    /// - `MAX_BODY_BYTES` - Upstream body size limit (default: 5242880)
    /// - `UPSTREAM_URL` - Base for relative URLs and the only origin fetched (default: http://127.0.0.1:5000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            prune_interval: env_or("PRUNE_INTERVAL", defaults.prune_interval),
            prefetch_delay_ms: env_or("PREFETCH_DELAY_MS", defaults.prefetch_delay_ms),
            request_timeout: env_or("REQUEST_TIMEOUT", defaults.request_timeout),
            max_body_bytes: env_or("MAX_BODY_BYTES", defaults.max_body_bytes),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval)
    }

    pub fn prefetch_delay(&self) -> Duration {
        Duration::from_millis(self.prefetch_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 50,
            default_ttl: 300,
            prune_interval: 60,
            prefetch_delay_ms: 100,
            request_timeout: 30,
            max_body_bytes: 5 * 1024 * 1024,
            upstream_url: "http://127.0.0.1:5000".to_string(),
            server_port: 3000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
