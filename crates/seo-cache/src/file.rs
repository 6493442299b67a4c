//! File-based cache implementation.
//!
//! [`FileCache`] stores each entry as a single file named after the SHA-256 of
//! its key. Every file starts with a binary header followed by the data:
//!
//! ```text
//! [expires_at: u64 LE, unix seconds, 0 = never][tags_len: u32 LE][tags, '\n'-joined][data bytes]
//! ```
//!
//! Tag cleaning scans the entries directory and reads only the headers.
//!
//! On construction, [`FileCache`] validates a `VERSION` file in the cache root.
//! If the version mismatches or is missing, the entire cache directory is wiped
//! and recreated. This ensures stale caches from previous builds are never used.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::{Cache, CacheError};

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION            # contains the cache version string
/// +-- entries/
///     +-- 3f1a...        # one file per key (hex SHA-256 of the key)
/// ```
pub struct FileCache {
    root: PathBuf,
}

/// Decoded entry header.
struct Header {
    expires_at: u64,
    tags: Vec<String>,
}

impl Header {
    fn is_expired(&self, now: u64) -> bool {
        self.expires_at != 0 && self.expires_at <= now
    }
}

impl FileCache {
    /// Create a new file-based cache at `root`, validating the cache version.
    ///
    /// If the `VERSION` file inside `root` does not match `version`, the entire
    /// cache directory is removed and recreated with the new version. Errors
    /// during validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    fn entries_dir(&self) -> PathBuf {
        self.root.join("entries")
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.entries_dir().join(hex::encode(digest))
    }
}

impl Cache for FileCache {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let header = read_header(&mut file)?;
        if header.is_expired(unix_now()) {
            let _ = fs::remove_file(&path);
            return Ok(None);
        }

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Some(data))
    }

    fn save(
        &self,
        key: &str,
        value: &[u8],
        tags: &[&str],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let expires_at = ttl.map_or(0, |ttl| unix_now().saturating_add(ttl.as_secs().max(1)));
        let tags_joined = tags.join("\n");
        let tag_bytes = tags_joined.as_bytes();
        let tags_len = u32::try_from(tag_bytes.len())
            .map_err(|_| CacheError::Corrupt("tag list too long".to_owned()))?;

        let mut buf = Vec::with_capacity(12 + tag_bytes.len() + value.len());
        buf.extend_from_slice(&expires_at.to_le_bytes());
        buf.extend_from_slice(&tags_len.to_le_bytes());
        buf.extend_from_slice(tag_bytes);
        buf.extend_from_slice(value);

        fs::write(&path, &buf)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, CacheError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn clean(&self, tags: &[&str]) -> Result<(), CacheError> {
        let dir = self.entries_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = entry?.path();
            let matches = if tags.is_empty() {
                true
            } else {
                // Unreadable entries are dropped along with the tagged ones
                File::open(&path)
                    .map_err(CacheError::from)
                    .and_then(|mut f| read_header(&mut f))
                    .map_or(true, |h| h.tags.iter().any(|t| tags.contains(&t.as_str())))
            };
            if matches {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

fn read_header(file: &mut File) -> Result<Header, CacheError> {
    let mut expires_buf = [0u8; 8];
    file.read_exact(&mut expires_buf)
        .map_err(|e| CacheError::Corrupt(format!("truncated header: {e}")))?;
    let expires_at = u64::from_le_bytes(expires_buf);

    let mut len_buf = [0u8; 4];
    file.read_exact(&mut len_buf)
        .map_err(|e| CacheError::Corrupt(format!("truncated header: {e}")))?;
    let tags_len = u32::from_le_bytes(len_buf) as usize;

    let mut tag_bytes = vec![0u8; tags_len];
    file.read_exact(&mut tag_bytes)
        .map_err(|e| CacheError::Corrupt(format!("truncated tag list: {e}")))?;
    let tags = String::from_utf8(tag_bytes)
        .map_err(|e| CacheError::Corrupt(format!("invalid tag list: {e}")))?
        .split('\n')
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect();

    Ok(Header { expires_at, tags })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Validate the cache version, wiping the directory on mismatch.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    // Try to read the existing version
    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!("cache version matches: {version}");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                "cache version mismatch (stored={stored}, current={version}), wiping cache"
            );
        }
        Err(_) => {
            tracing::info!("no cache VERSION file found, initializing cache");
        }
    }

    // Wipe and recreate
    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to remove cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}
