//! Fetch Options
//!
//! Cache control flags and the request fields forwarded to the network.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::DEFAULT_TTL;
use crate::error::FetchError;

// == Request Options ==
/// Fields forwarded verbatim to the HTTP request.
///
/// Every field that is set also takes part in cache key derivation, so two
/// requests to the same URL with different bodies or headers are cached
/// separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// HTTP method, GET when unset
    pub method: Option<String>,
    /// Headers that override the default `Accept` and `Cache-Control`
    pub headers: BTreeMap<String, String>,
    /// Raw request body
    pub body: Option<String>,
}

impl RequestOptions {
    // == Key Params ==
    /// Option fields as `name -> value` pairs for cache key derivation.
    ///
    /// Each header becomes its own `headers.<lowercased-name>` param and every
    /// value is written as a JSON string literal, so no combination of names
    /// and values can run into another pair. Header names are case-insensitive
    /// and the last spelling wins, as in [`RequestOptions::header_map`].
    pub fn key_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(method) = &self.method {
            params.push(("method".to_string(), encode_value(method)));
        }
        let headers: BTreeMap<String, &String> = self
            .headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        for (name, value) in headers {
            params.push((format!("headers.{}", name), encode_value(value)));
        }
        if let Some(body) = &self.body {
            params.push(("body".to_string(), encode_value(body)));
        }
        params
    }

    /// HTTP method to send, GET when unset.
    pub fn http_method(&self) -> Result<Method, FetchError> {
        match &self.method {
            None => Ok(Method::GET),
            Some(method) => Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| FetchError::InvalidRequest(format!("invalid method '{}'", method))),
        }
    }

    // == Header Map ==
    /// Default JSON headers merged with the caller's; caller headers win.
    pub fn header_map(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| FetchError::InvalidRequest(format!("invalid header name '{}'", name)))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                FetchError::InvalidRequest(format!("invalid value for header '{}'", name))
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

// == Fetch Options ==
/// Options of a single cached fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// Read, write and fall back on the cache; `false` bypasses it entirely
    pub use_cache: bool,
    /// TTL applied when a fresh response is stored
    pub max_age: Duration,
    /// Skip the cache read but still store and still fall back on error
    pub force_refresh: bool,
    /// Fields forwarded to the network request
    pub request: RequestOptions,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            max_age: DEFAULT_TTL,
            force_refresh: false,
            request: RequestOptions::default(),
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.request.method = Some(method.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.request.body = Some(body.into());
        self
    }
}

/// Quotes and escapes `value` so it cannot contain a bare `&`-separated pair.
fn encode_value(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}
