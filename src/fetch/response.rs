//! Cached Response
//!
//! Wraps a payload with where it came from, without touching its own fields.

use serde::{Deserialize, Serialize};

/// Result of a cached fetch.
///
/// Serialized as `{"data": ..., "fromCache": bool, "stale": bool}` so a
/// payload that happens to contain a `fromCache` field is never clobbered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedResponse<T> {
    pub data: T,
    /// Served from the cache instead of the network
    pub from_cache: bool,
    /// Served from the cache because the network request failed
    pub stale: bool,
}

impl<T> CachedResponse<T> {
    /// Freshly fetched from the network.
    pub fn fresh(data: T) -> Self {
        Self {
            data,
            from_cache: false,
            stale: false,
        }
    }

    /// Valid cache hit, no network I/O.
    pub fn hit(data: T) -> Self {
        Self {
            data,
            from_cache: true,
            stale: false,
        }
    }

    /// Cached fallback after a failed network request.
    pub fn stale(data: T) -> Self {
        Self {
            data,
            from_cache: true,
            stale: true,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CachedResponse<U> {
        CachedResponse {
            data: f(self.data),
            from_cache: self.from_cache,
            stale: self.stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrapper_keeps_payload_namespace() {
        let response = CachedResponse::hit(json!({"fromCache": "payload field"}));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["data"]["fromCache"], "payload field");
        assert_eq!(value["fromCache"], true);
        assert_eq!(value["stale"], false);
    }

    #[test]
    fn test_constructors_set_flags() {
        assert!(!CachedResponse::fresh(1).from_cache);
        assert!(CachedResponse::hit(1).from_cache);
        let stale = CachedResponse::stale(1);
        assert!(stale.from_cache && stale.stale);
    }

    #[test]
    fn test_map_preserves_flags() {
        let mapped = CachedResponse::stale(2).map(|n| n * 10);
        assert_eq!(mapped, CachedResponse::stale(20));
    }
}
