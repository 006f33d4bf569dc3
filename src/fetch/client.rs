//! Cached Fetcher
//!
//! Cache-first JSON fetch with write-on-success and stale fallback on failure.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheKey, SharedCache};
use crate::config::Config;
use crate::error::FetchError;
use crate::fetch::{CachedResponse, FetchOptions, RequestOptions};

/// Response bodies larger than this are refused unless configured otherwise.
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

// == Cached Fetcher ==
/// Single entry point for obtaining JSON resources through the cache.
///
/// Cloning is cheap: clones share the HTTP connection pool and the store.
#[derive(Debug, Clone)]
pub struct CachedFetcher {
    client: Client,
    cache: SharedCache,
    base_url: Option<Url>,
    max_body_bytes: usize,
}

impl CachedFetcher {
    // == Constructors ==
    /// Creates a fetcher that only accepts absolute URLs.
    pub fn new(client: Client, cache: SharedCache) -> Self {
        Self {
            client,
            cache,
            base_url: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Resolves relative URLs such as `/api/calendar/2024/5` against `base_url`
    /// and refuses URLs on any other origin.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Builds the HTTP client with the configured timeout and upstream base.
    pub fn from_config(config: &Config, cache: SharedCache) -> Result<Self, FetchError> {
        let client = build_client(config.request_timeout())?;
        let base_url = Url::parse(&config.upstream_url).map_err(|e| FetchError::InvalidUrl {
            url: config.upstream_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(client, cache)
            .with_base_url(base_url)
            .with_max_body_bytes(config.max_body_bytes))
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Fetch ==
    /// Fetches `url` as JSON, going through the cache as `options` dictate.
    ///
    /// The cache is read once, before any network I/O. A valid entry is
    /// returned straight away unless `force_refresh` is set; otherwise it is
    /// kept as the fallback for a failed request. Fails only when the request
    /// fails and that lookup found nothing.
    pub async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<CachedResponse<Value>, FetchError> {
        let cache_key = CacheKey::derive(url, options.request.key_params());

        // A fallback snapshot counts as a hit only once it is served
        let snapshot = match (options.use_cache, options.force_refresh) {
            (false, _) => None,
            (true, true) => self.cache.write().await.lookup(&cache_key),
            (true, false) => {
                let cached = self.cache.write().await.get(&cache_key);
                if let Some(data) = cached {
                    debug!("Cache hit for: {}", url);
                    return Ok(CachedResponse::hit(data));
                }
                None
            }
        };

        debug!("Fetching: {}", url);

        match self.request(url, &options.request).await {
            Ok(data) => {
                if options.use_cache {
                    self.cache
                        .write()
                        .await
                        .set(cache_key, data.clone(), Some(options.max_age));
                }
                Ok(CachedResponse::fresh(data))
            }
            Err(err) => match snapshot {
                Some(data) => {
                    warn!("Fetch error for {}: {}; returning stale cache", url, err);
                    self.cache.write().await.record_hit();
                    Ok(CachedResponse::stale(data))
                }
                None => {
                    warn!("Fetch error for {}: {}", url, err);
                    Err(err)
                }
            },
        }
    }

    /// Like [`CachedFetcher::fetch`], then decodes the payload into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<CachedResponse<T>, FetchError> {
        let CachedResponse {
            data,
            from_cache,
            stale,
        } = self.fetch(url, options).await?;
        let data = serde_json::from_value(data).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok(CachedResponse {
            data,
            from_cache,
            stale,
        })
    }

    // == Network ==
    async fn request(&self, url: &str, options: &RequestOptions) -> Result<Value, FetchError> {
        let target = self.resolve(url)?;

        let mut builder = self
            .client
            .request(options.http_method()?, target)
            .headers(options.header_map()?);
        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        let mut response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let too_large = || FetchError::BodyTooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        };
        if response
            .content_length()
            .is_some_and(|length| length > self.max_body_bytes as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    // == Resolve ==
    /// Turns `url` into the address that would be requested.
    ///
    /// With a base URL, relative paths are joined onto it and absolute URLs
    /// must share its origin. Without one, only absolute URLs are accepted.
    pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        let invalid = |reason: String| FetchError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let Some(base) = &self.base_url else {
            return Url::parse(url).map_err(|e| invalid(e.to_string()));
        };

        let target = base.join(url).map_err(|e| invalid(e.to_string()))?;
        if target.origin() != base.origin() {
            return Err(invalid(format!(
                "only {} may be fetched",
                base.origin().ascii_serialization()
            )));
        }
        Ok(target)
    }
}

/// HTTP client whose requests give up after `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    Ok(Client::builder().timeout(timeout).build()?)
}
