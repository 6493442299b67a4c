//! Tag-scoped cache abstraction for the SEO engine.
//!
//! This crate provides the [`Cache`] trait that decouples template and
//! structured-data resolution from the underlying storage. Entries are
//! addressed by key, expire after an optional TTL, and carry a set of tags
//! so whole groups can be invalidated at once with [`Cache::clean`].
//!
//! # Implementations
//!
//! - [`NullCache`]: No-op implementation (always misses)
//! - [`MemoryCache`]: In-process map with TTL and a tag index
//! - [`FileCache`]: File-based implementation with version validation
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use seo_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! cache
//!     .save("meta:product:42", b"{}", &["seo_meta_tags"], Some(Duration::from_secs(60)))
//!     .unwrap();
//! assert_eq!(cache.load("meta:product:42").unwrap(), Some(b"{}".to_vec()));
//!
//! cache.clean(&["seo_meta_tags"]).unwrap();
//! assert_eq!(cache.load("meta:product:42").unwrap(), None);
//! ```

mod ext;
mod file;
mod memory;

use std::time::Duration;

pub use ext::CacheExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// Error raised by a cache backend.
///
/// Callers in this workspace never propagate these: a failing backend is
/// logged and treated as a miss (for loads) or a no-op (for writes).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O error from a persistent backend.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored entry could not be decoded.
    #[error("corrupt cache entry: {0}")]
    Corrupt(String),
    /// Backend is not reachable.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Key-value cache with tag-based invalidation.
///
/// Keys are opaque strings chosen by the caller (usually a content hash).
/// Every entry is stored with zero or more tags; [`clean`](Self::clean)
/// removes every entry carrying at least one of the given tags.
///
/// Writes are overwrite-last-wins. Entries are never mutated in place.
pub trait Cache: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `Ok(None)` on a miss or when the entry has expired.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value under `key`, replacing any previous entry.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key
    /// * `value` - Raw bytes to cache
    /// * `tags` - Labels used for bulk invalidation
    /// * `ttl` - Lifetime of the entry (`None` keeps it until removed)
    fn save(
        &self,
        key: &str,
        value: &[u8],
        tags: &[&str],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    /// Remove a single entry. Returns `true` if an entry was removed.
    fn remove(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every entry tagged with any of `tags`.
    ///
    /// An empty tag list removes all entries.
    fn clean(&self, tags: &[&str]) -> Result<(), CacheError>;
}

/// No-op [`Cache`] that never stores or retrieves data.
///
/// Use when caching is disabled. Every `load` misses and every write is
/// silently discarded.
#[derive(Debug, Default)]
pub struct NullCache;

impl Cache for NullCache {
    fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn save(
        &self,
        _key: &str,
        _value: &[u8],
        _tags: &[&str],
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    fn clean(&self, _tags: &[&str]) -> Result<(), CacheError> {
        Ok(())
    }
}
