// Cache store for repository metadata.
// Whole-document read-modify-write over an injected storage backend, with a 24 hour expiry.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::backend::{FileBackend, StorageBackend};

/// Entries older than this are treated as stale on read.
pub const EXPIRY_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// One cached API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Raw response body, opaque to the cache.
    pub data: Value,
    /// When the entry was written, in epoch milliseconds.
    pub timestamp: i64,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(data: Value) -> Self {
        Self::at(data, Utc::now())
    }

    /// Create an entry stamped with an explicit time.
    pub fn at(data: Value, cached_at: DateTime<Utc>) -> Self {
        Self {
            data,
            timestamp: cached_at.timestamp_millis(),
        }
    }

    /// Check whether the entry is still inside the expiry window at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now.timestamp_millis() - self.timestamp;
        // Entries stamped in the future count as fresh
        age_ms < EXPIRY_WINDOW.as_millis() as i64
    }
}

/// Full persisted mapping from `owner/name` to entry.
pub type CacheMap = BTreeMap<String, CacheEntry>;

/// Result of a best-effort write. Failures are logged where they happen;
/// callers may inspect the outcome but are never forced to handle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    Written,
    Failed { reason: String },
}

impl Persisted {
    pub fn is_written(&self) -> bool {
        matches!(self, Persisted::Written)
    }
}

/// Durable key-value store of repository metadata.
///
/// Every operation round-trips the whole document through the backend and
/// nothing is locked between the read and the write of `put`. Two concurrent
/// `put` calls can therefore lose one of the updates (last writer wins). The
/// store is meant for a single process with a handful of entries, where that
/// race is accepted.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn StorageBackend>,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Store backed by a JSON file at `path`.
    pub fn file(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(path)))
    }

    /// Load the whole mapping. Missing or unparsable storage reads as empty.
    pub fn read(&self) -> CacheMap {
        let contents = match self.backend.load() {
            Ok(Some(contents)) => contents,
            Ok(None) => return CacheMap::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cache, treating as empty");
                return CacheMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(e) => {
                debug!(error = %e, "Cache contents unparsable, treating as empty");
                CacheMap::new()
            }
        }
    }

    /// Persist the whole mapping.
    pub fn write(&self, map: &CacheMap) -> Persisted {
        let result = serde_json::to_string_pretty(map)
            .map_err(|e| e.to_string())
            .and_then(|json| self.backend.save(&json).map_err(|e| e.to_string()));

        match result {
            Ok(()) => Persisted::Written,
            Err(reason) => {
                error!(%reason, "Failed to write cache");
                Persisted::Failed { reason }
            }
        }
    }

    /// Cached data for `key` if present and not expired.
    ///
    /// Expired entries are left in storage until overwritten.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Utc::now())
    }

    /// Like [`CacheStore::get`], judged against an explicit instant.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        let mut map = self.read();
        match map.remove(key) {
            Some(entry) if entry.is_valid_at(now) => Some(entry.data),
            Some(_) => {
                debug!(repo = %key, "Cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Replace the entry for `key` with `data` stamped now.
    pub fn put(&self, key: &str, data: Value) -> Persisted {
        let mut map = self.read();
        map.insert(key.to_string(), CacheEntry::new(data));
        self.write(&map)
    }

    /// Delete the backing storage. Absence is not an error.
    pub fn clear(&self) -> Persisted {
        match self.backend.remove() {
            Ok(()) => Persisted::Written,
            Err(e) => {
                error!(error = %e, "Failed to clear cache");
                Persisted::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Whether the backing storage currently holds a document.
    pub fn exists(&self) -> bool {
        self.backend.exists()
    }
}
