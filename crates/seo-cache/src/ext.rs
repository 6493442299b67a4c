//! Extension trait for [`Cache`] with typed convenience methods.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Cache;

/// Typed, failure-tolerant convenience methods for [`Cache`].
///
/// Provides `load_json`/`save_json` for serde-serializable types and
/// `load_string`/`save_string` for UTF-8 strings. Backend errors are logged
/// and swallowed: a failing load is a miss, a failing write is a no-op. This
/// keeps every caller correct when the cache is unavailable, at the cost of
/// recomputing.
///
/// # Example
///
/// ```
/// use seo_cache::{CacheExt, MemoryCache};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Tags { title: String }
///
/// let cache = MemoryCache::new();
/// cache.save_json("tags", &Tags { title: "Hello".into() }, &["meta"], None);
/// let data: Option<Tags> = cache.load_json("tags");
/// assert_eq!(data.unwrap().title, "Hello");
/// ```
pub trait CacheExt: Cache {
    /// Retrieve a JSON-deserialized value from the cache.
    ///
    /// Returns `None` on miss, backend failure, or deserialization failure.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = load_logged(self, key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Store a value as JSON in the cache.
    ///
    /// Silently does nothing if serialization or the backend fails.
    fn save_json<T: Serialize>(&self, key: &str, value: &T, tags: &[&str], ttl: Option<Duration>) {
        match serde_json::to_vec(value) {
            Ok(bytes) => save_logged(self, key, &bytes, tags, ttl),
            Err(e) => tracing::debug!(key, error = %e, "Failed to serialize cache entry"),
        }
    }

    /// Retrieve a cached UTF-8 string.
    ///
    /// Returns `None` on miss, backend failure, or invalid UTF-8.
    fn load_string(&self, key: &str) -> Option<String> {
        let bytes = load_logged(self, key)?;
        String::from_utf8(bytes).ok()
    }

    /// Store a string value in the cache.
    fn save_string(&self, key: &str, value: &str, tags: &[&str], ttl: Option<Duration>) {
        save_logged(self, key, value.as_bytes(), tags, ttl);
    }

    /// Remove an entry, logging backend failures.
    fn remove_logged(&self, key: &str) {
        if let Err(e) = self.remove(key) {
            tracing::warn!(key, error = %e, "Cache remove failed");
        }
    }

    /// Clean tags, logging backend failures.
    fn clean_logged(&self, tags: &[&str]) {
        if let Err(e) = self.clean(tags) {
            tracing::warn!(?tags, error = %e, "Cache clean failed");
        }
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

fn load_logged<C: Cache + ?Sized>(cache: &C, key: &str) -> Option<Vec<u8>> {
    match cache.load(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Cache load failed, treating as miss");
            None
        }
    }
}

fn save_logged<C: Cache + ?Sized>(
    cache: &C,
    key: &str,
    value: &[u8],
    tags: &[&str],
    ttl: Option<Duration>,
) {
    if let Err(e) = cache.save(key, value, tags, ttl) {
        tracing::warn!(key, error = %e, "Cache save failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheError, MemoryCache, NullCache};

    /// Backend that fails every operation.
    struct BrokenCache;

    impl Cache for BrokenCache {
        fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Unavailable("down".to_owned()))
        }

        fn save(
            &self,
            _key: &str,
            _value: &[u8],
            _tags: &[&str],
            _ttl: Option<Duration>,
        ) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".to_owned()))
        }

        fn remove(&self, _key: &str) -> Result<bool, CacheError> {
            Err(CacheError::Unavailable("down".to_owned()))
        }

        fn clean(&self, _tags: &[&str]) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".to_owned()))
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let cache = MemoryCache::new();
        cache.save_json("k", &vec!["a", "b"], &[], None);

        let value: Option<Vec<String>> = cache.load_json("k");
        assert_eq!(value, Some(vec!["a".to_owned(), "b".to_owned()]));
    }

    #[test]
    fn test_load_json_wrong_shape_is_miss() {
        let cache = MemoryCache::new();
        cache.save_string("k", "not json", &[], None);

        let value: Option<Vec<String>> = cache.load_json("k");
        assert_eq!(value, None);
    }

    #[test]
    fn test_broken_backend_is_a_miss() {
        let cache = BrokenCache;

        cache.save_string("k", "v", &["t"], None);
        assert_eq!(cache.load_string("k"), None);
        cache.remove_logged("k");
        cache.clean_logged(&["t"]);
    }

    #[test]
    fn test_null_cache_through_ext() {
        let cache = NullCache;
        cache.save_string("k", "v", &[], None);
        assert_eq!(cache.load_string("k"), None);
    }
}
