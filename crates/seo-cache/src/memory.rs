//! In-process cache implementation.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::{Cache, CacheError};

struct Entry {
    value: Vec<u8>,
    tags: HashSet<String>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory [`Cache`] with TTL and tag support.
///
/// Expired entries are dropped lazily on access. Suitable for tests, the CLI,
/// and single-process deployments.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .unwrap()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Whether the cache holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        self.entries.write().unwrap().remove(key);
        Ok(None)
    }

    fn save(
        &self,
        key: &str,
        value: &[u8],
        tags: &[&str],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let entry = Entry {
            value: value.to_vec(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            // A lifetime past the clock's range never expires
            expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
        };
        self.entries.write().unwrap().insert(key.to_owned(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.write().unwrap().remove(key).is_some())
    }

    fn clean(&self, tags: &[&str]) -> Result<(), CacheError> {
        let mut entries = self.entries.write().unwrap();
        if tags.is_empty() {
            entries.clear();
        } else {
            entries.retain(|_, entry| !tags.iter().any(|t| entry.tags.contains(*t)));
        }
        Ok(())
    }
}
