//! Exclude-pattern matching over workspace-relative paths.
//!
//! Patterns are a restricted glob dialect: `**` matches zero or more
//! path segments, `*` matches within a single segment, `?` matches one
//! character. Matching is always against forward-slash paths; callers
//! can hand in native separators and they are normalized first.

use glob::{MatchOptions, Pattern};
use tracing::debug;

/// A set of exclude patterns compiled once per configuration load.
#[derive(Debug, Clone, Default)]
pub struct ExcludeMatcher {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    pattern: Pattern,
    /// For patterns ending in `/**`: matches the directory itself
    /// (the zero-segment suffix case, which `Pattern` alone misses).
    dir_prefix: Option<Pattern>,
}

/// `*` and `?` must not cross segment boundaries.
fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

impl ExcludeMatcher {
    /// Compile a pattern list. Patterns that fail to compile are
    /// dropped and never match, rather than aborting the count.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut entries = Vec::with_capacity(patterns.len());
        for raw in patterns {
            let raw = raw.as_ref();
            let pattern = match Pattern::new(raw) {
                Ok(p) => p,
                Err(err) => {
                    debug!(pattern = raw, %err, "skipping invalid exclude pattern");
                    continue;
                }
            };
            let dir_prefix = raw
                .strip_suffix("/**")
                .and_then(|prefix| Pattern::new(prefix).ok());
            entries.push(Entry {
                pattern,
                dir_prefix,
            });
        }
        Self { entries }
    }

    /// Whether a workspace-relative path matches any exclude pattern.
    ///
    /// First match short-circuits. Backslashes are normalized to
    /// forward slashes before matching.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let normalized = normalize(rel_path);
        let opts = match_options();
        self.entries.iter().any(|entry| {
            entry.pattern.matches_with(&normalized, opts)
                || entry
                    .dir_prefix
                    .as_ref()
                    .is_some_and(|p| p.matches_with(&normalized, opts))
        })
    }

    /// Number of successfully compiled patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no patterns compiled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize a relative path to forward slashes.
pub fn normalize(path: &str) -> String {
    if path.contains('\\') {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}
