//! Process-lifetime cache for values derived from large, rarely changing inputs
//! (the parsed diagnostic-criteria index).
//!
//! Provides:
//! - Content hash-based cache keys (SHA-256 over every input that shapes the value)
//! - Rebuild only when the key changes
//! - Thread-safe access; values are handed out as `Arc<T>`

use std::sync::{Arc, Mutex, MutexGuard};

use sha2::{Digest, Sha256};

struct CachedIndex<T> {
    data: Arc<T>,
    content_hash: String,
}

pub struct IndexCache<T> {
    slot: Mutex<Option<CachedIndex<T>>>,
}

impl<T> IndexCache<T> {
    pub fn new() -> Self {
        IndexCache {
            slot: Mutex::new(None),
        }
    }

    // A panic while building leaves the slot untouched, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Option<CachedIndex<T>>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached value if it was built from content with this hash.
    pub fn get(&self, content_hash: &str) -> Option<Arc<T>> {
        let slot = self.lock();
        slot.as_ref()
            .filter(|cached| cached.content_hash == content_hash)
            .map(|cached| Arc::clone(&cached.data))
    }

    /// Return the cached value for `content_hash`, building and storing it on a miss.
    ///
    /// The lock is held while building so concurrent callers build at most once.
    pub fn get_or_build(&self, content_hash: &str, build: impl FnOnce() -> T) -> Arc<T> {
        let mut slot = self.lock();
        if let Some(cached) = slot.as_ref() {
            if cached.content_hash == content_hash {
                return Arc::clone(&cached.data);
            }
        }

        tracing::debug!(content_hash, "building cached index");
        let data = Arc::new(build());
        *slot = Some(CachedIndex {
            data: Arc::clone(&data),
            content_hash: content_hash.to_string(),
        });
        data
    }

    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    pub fn stats(&self) -> CacheStats {
        let slot = self.lock();
        CacheStats {
            cached: slot.is_some(),
            content_hash: slot.as_ref().map(|c| c.content_hash.clone()),
        }
    }
}

impl<T> Default for IndexCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub cached: bool,
    pub content_hash: Option<String>,
}

/// SHA-256 hex digest over the given parts.
///
/// Each part is length-prefixed so `["ab", "c"]` and `["a", "bc"]` hash differently.
pub fn content_hash(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
