//! The refresh engine: one explicit context object owning the cache
//! and configuration, in place of ambient singletons.
//!
//! Refreshes for the same root are serialized by a per-root lock map:
//! a caller that arrives while a count is in flight blocks on that
//! root's lock and then re-checks the cache, so concurrent triggers
//! (timer ticks, file events, manual refresh) never duplicate a walk
//! or let a stale result overwrite a newer one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::debug;

use crate::cache::ResultCache;
use crate::config::Config;
use crate::counter::{self, LineCountResult};
use crate::git::{self, GitStats};
use crate::Result;

/// Everything the presentation layer needs for one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceStats {
    /// Line counts, possibly served from cache
    pub count: Arc<LineCountResult>,
    /// Branch/diff statistics; `None` outside a repository
    pub git: Option<GitStats>,
}

/// Refresh engine for one process.
///
/// Owns the result cache; hand it shared references from wherever
/// refresh triggers live. Teardown is just dropping it.
pub struct StatsEngine {
    config: Config,
    cache: Mutex<ResultCache>,
    in_flight: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl StatsEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: Mutex::new(ResultCache::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current statistics for `root`, serving the line count from
    /// cache when the repository state has not moved.
    pub fn refresh(&self, root: &Path) -> Result<WorkspaceStats> {
        self.refresh_inner(root, false)
    }

    /// Current statistics for `root`, always recounting.
    pub fn refresh_now(&self, root: &Path) -> Result<WorkspaceStats> {
        self.refresh_inner(root, true)
    }

    fn refresh_inner(&self, root: &Path, bypass_cache: bool) -> Result<WorkspaceStats> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

        // Serialize refreshes per root; a second caller blocks here and
        // then finds the first caller's result in the cache.
        let root_lock = self.lock_for(&root);
        let _guard = root_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let head = git::head_commit(&root);
        let fp = git::fingerprint(&root);

        let count = if bypass_cache {
            None
        } else {
            self.cache
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .get(&root, head.as_deref(), &fp)
        };
        let count = match count {
            Some(cached) => {
                debug!(root = %root.display(), "serving line count from cache");
                cached
            }
            None => {
                let fresh = Arc::new(counter::count(&root, &self.config)?);
                self.cache
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .set(&root, head, fp, Arc::clone(&fresh));
                fresh
            }
        };

        // Git stats are cheap relative to the walk and always fresh.
        let git = git::stats(&root, &self.config);

        Ok(WorkspaceStats { count, git })
    }

    /// Drop any cached count for `root`.
    pub fn invalidate(&self, root: &Path) {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear_for_root(&root);
    }

    /// Drop every cached count.
    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn lock_for(&self, root: &Path) -> Arc<Mutex<()>> {
        let mut map = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(map.entry(root.to_path_buf()).or_default())
    }
}
