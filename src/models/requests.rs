//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies and queries.

use std::time::Duration;

use serde::Deserialize;

use crate::fetch::{FetchOptions, RequestOptions};

/// Request body for `POST /fetch` and `POST /prefetch`
///
/// # Fields
/// - `url`: absolute URL, or a path resolved against the upstream base
/// - `method`, `headers`, `body`: forwarded to the upstream request
/// - `useCache`, `maxAge` (seconds), `forceRefresh`: cache control
///
/// Field names are camelCase, like the `fromCache` flag in the reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub url: String,
    #[serde(flatten)]
    pub request: RequestOptions,
    #[serde(default)]
    pub use_cache: Option<bool>,
    #[serde(default)]
    pub max_age: Option<u64>,
    #[serde(default)]
    pub force_refresh: Option<bool>,
}

impl FetchRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        None
    }

    /// Fetch options with unset fields left at their defaults.
    pub fn options(&self) -> FetchOptions {
        let defaults = FetchOptions::default();
        FetchOptions {
            use_cache: self.use_cache.unwrap_or(defaults.use_cache),
            max_age: self
                .max_age
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_age),
            force_refresh: self.force_refresh.unwrap_or(defaults.force_refresh),
            request: self.request.clone(),
        }
    }
}

/// Query for `DELETE /cache/entry`
#[derive(Debug, Clone, Deserialize)]
pub struct ClearEntryQuery {
    /// Derived cache key, e.g. `/api/calendar/2024/5?`
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_request_minimal() {
        let req: FetchRequest = serde_json::from_str(r#"{"url": "/api/rooms"}"#).unwrap();
        assert!(req.validate().is_none());
        assert_eq!(req.options(), FetchOptions::default());
    }

    #[test]
    fn test_fetch_request_full() {
        let json = r#"{
            "url": "/api/clients",
            "method": "POST",
            "headers": {"X-Hotel": "1"},
            "body": "{}",
            "useCache": false,
            "maxAge": 30,
            "forceRefresh": true
        }"#;
        let req: FetchRequest = serde_json::from_str(json).unwrap();
        let options = req.options();

        assert!(!options.use_cache);
        assert!(options.force_refresh);
        assert_eq!(options.max_age, Duration::from_secs(30));
        assert_eq!(options.request.method.as_deref(), Some("POST"));
        assert_eq!(options.request.headers["X-Hotel"], "1");
        assert_eq!(options.request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_snake_case_flags_are_ignored() {
        let req: FetchRequest =
            serde_json::from_str(r#"{"url": "/x", "force_refresh": true}"#).unwrap();
        assert!(!req.options().force_refresh);
    }

    #[test]
    fn test_validate_empty_url() {
        let req: FetchRequest = serde_json::from_str(r#"{"url": "  "}"#).unwrap();
        assert!(req.validate().is_some());
    }
}
