//! Cache Key Module
//!
//! Derives deterministic cache keys from a request URL and its option fields.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

// == Cache Key ==
/// Identity of a cached request.
///
/// Two keys are equal when their derived strings are byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    // == Derive ==
    /// Derives a key from a URL and a set of `name -> value` option fields.
    ///
    /// Option names are sorted so that the same logical request always yields
    /// the same key, whatever order the fields were supplied in. The pairs are
    /// joined as `name=value` with `&` and appended to the URL after `?`.
    pub fn derive<I, K, V>(url: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut pairs: Vec<(String, String)> = params
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let query = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        Self(format!("{}?{}", url, query))
    }

    /// Returns the derived key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for CacheKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
