//! Configuration for counting and refresh behavior.
//!
//! All options have defaults that match what a status-bar deployment
//! wants out of the box; a host can deserialize a `Config` from JSON
//! or build one with the setter methods.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Minimum allowed refresh interval in milliseconds.
pub const MIN_UPDATE_INTERVAL_MS: u64 = 1000;

/// Default refresh interval in milliseconds.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 5000;

/// Configuration for the line counter and refresh loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether the tool is active at all
    pub enabled: bool,
    /// File extensions to count (lowercased, without leading dot)
    pub include_extensions: BTreeSet<String>,
    /// Glob patterns excluded from the filesystem walk
    pub exclude_patterns: Vec<String>,
    /// Milliseconds between automatic refreshes (clamped to >= 1000)
    pub update_interval_ms: u64,
    /// Show branch diff statistics against the trunk branch
    pub show_branch_stats: bool,
    /// Show staged/unstaged/untracked working-tree statistics
    pub show_working_changes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            include_extensions: default_extensions(),
            exclude_patterns: default_exclude_patterns(),
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            show_branch_stats: true,
            show_working_changes: true,
        }
    }
}

impl Config {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of counted extensions.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_extensions = exts
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Replace the exclude pattern list.
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns.into_iter().map(|p| p.into()).collect();
        self
    }

    /// Set the refresh interval in milliseconds.
    pub fn interval_ms(mut self, ms: u64) -> Self {
        self.update_interval_ms = ms;
        self
    }

    /// The refresh interval, clamped to the allowed minimum.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.max(MIN_UPDATE_INTERVAL_MS))
    }
}

/// Extensions counted by default: common source, config, and markup types.
fn default_extensions() -> BTreeSet<String> {
    [
        "c", "cc", "cfg", "clj", "conf", "cpp", "cs", "css", "dart", "el", "elm", "erl", "ex",
        "exs", "go", "gradle", "graphql", "h", "hpp", "hs", "html", "ini", "java", "jl", "js",
        "json", "jsx", "kt", "kts", "less", "lua", "m", "md", "ml", "mli", "nim", "php", "pl",
        "proto", "ps1", "py", "r", "rb", "rs", "rst", "sass", "scala", "scss", "sh", "sql",
        "svelte", "swift", "tex", "tf", "toml", "ts", "tsx", "vim", "vue", "xml", "yaml", "yml",
        "zig",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Patterns excluded by default: build output, dependency trees, lock
/// files, and minified assets.
fn default_exclude_patterns() -> Vec<String> {
    [
        "**/node_modules/**",
        "**/target/**",
        "**/dist/**",
        "**/build/**",
        "**/out/**",
        "**/vendor/**",
        "**/__pycache__/**",
        "**/.venv/**",
        "**/venv/**",
        "**/coverage/**",
        "**/*.min.js",
        "**/*.min.css",
        "**/*.lock",
        "**/package-lock.json",
        "**/yarn.lock",
        "**/pnpm-lock.yaml",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.enabled);
        assert!(config.include_extensions.contains("rs"));
        assert!(config.include_extensions.contains("py"));
        assert!(config
            .exclude_patterns
            .iter()
            .any(|p| p.contains("node_modules")));
        assert_eq!(config.update_interval_ms, DEFAULT_UPDATE_INTERVAL_MS);
    }

    #[test]
    fn test_interval_clamped_to_minimum() {
        let config = Config::new().interval_ms(200);
        assert_eq!(config.update_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_extensions_normalized() {
        let config = Config::new().extensions([".RS", "Py"]);
        assert!(config.include_extensions.contains("rs"));
        assert!(config.include_extensions.contains("py"));
        assert_eq!(config.include_extensions.len(), 2);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: Config =
            serde_json::from_str(r#"{"update_interval_ms": 9000, "show_branch_stats": false}"#)
                .unwrap();
        assert_eq!(config.update_interval_ms, 9000);
        assert!(!config.show_branch_stats);
        // Unspecified fields keep their defaults
        assert!(config.enabled);
        assert!(config.include_extensions.contains("rs"));
    }
}
