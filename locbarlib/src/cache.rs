//! Memoization of the most recent count per workspace root.
//!
//! One entry per root. An entry is valid only while it is younger than
//! the TTL and the repository head and working-tree fingerprint still
//! match; a lookup that finds a stale entry evicts it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::counter::LineCountResult;

/// How long a cached count stays valid.
pub const CACHE_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug)]
struct CacheEntry {
    head: Option<String>,
    fingerprint: String,
    result: Arc<LineCountResult>,
    created_at: Instant,
}

/// Cache of the most recent [`LineCountResult`] per workspace root.
#[derive(Debug)]
pub struct ResultCache {
    entries: HashMap<PathBuf, CacheEntry>,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    /// Create a cache with the standard 5 second TTL.
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Look up the cached result for `root`.
    ///
    /// Returns `None` when no entry exists, the entry has outlived the
    /// TTL, or `head`/`fingerprint` no longer match; in the stale
    /// cases the entry is evicted as a side effect.
    pub fn get(
        &mut self,
        root: &Path,
        head: Option<&str>,
        fingerprint: &str,
    ) -> Option<Arc<LineCountResult>> {
        let entry = self.entries.get(root)?;
        let expired = entry.created_at.elapsed() > self.ttl;
        let moved = entry.head.as_deref() != head || entry.fingerprint != fingerprint;
        if expired || moved {
            debug!(
                root = %root.display(),
                expired,
                "evicting stale cache entry"
            );
            self.entries.remove(root);
            return None;
        }
        self.entries.get(root).map(|entry| Arc::clone(&entry.result))
    }

    /// Store a fresh result for `root`, replacing any previous entry.
    pub fn set(
        &mut self,
        root: &Path,
        head: Option<String>,
        fingerprint: String,
        result: Arc<LineCountResult>,
    ) {
        self.entries.insert(
            root.to_path_buf(),
            CacheEntry {
                head,
                fingerprint,
                result,
                created_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop the entry for one root, if any.
    pub fn clear_for_root(&mut self, root: &Path) {
        self.entries.remove(root);
    }

    /// Number of live entries (stale ones included until looked up).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
