//! # locbarlib
//!
//! Counts lines of code in a workspace and annotates them with git
//! branch/diff statistics, with a short-lived result cache keyed on
//! repository state.
//!
//! ## Overview
//!
//! The crate is built around one refresh pipeline:
//!
//! - **Enumeration**: inside a git repository, the file list is the
//!   union of tracked and untracked-but-not-ignored files; elsewhere a
//!   recursive walk applies configurable exclude globs.
//! - **Classification**: files count only when their extension is
//!   configured (or their name is a conventional extensionless project
//!   file) and their content is not binary.
//! - **Counting**: a file's line count is its number of line
//!   terminators; a CRLF pair counts once and terminator-free content
//!   counts zero.
//! - **Caching**: the most recent count per root is reused for up to
//!   five seconds, as long as the repository head and working-tree
//!   fingerprint have not moved.
//! - **Git stats**: branch identity, three-dot diff totals against the
//!   detected trunk, and staged/unstaged/untracked change counts,
//!   recomputed on every refresh.
//!
//! ## Example
//!
//! ```rust
//! use locbarlib::{Config, StatsEngine};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("main.rs"), "fn main() {\n    println!(\"hi\");\n}\n").unwrap();
//!
//! let engine = StatsEngine::new(Config::default());
//! let stats = engine.refresh(dir.path()).unwrap();
//! assert_eq!(stats.count.total_lines, 3);
//! assert_eq!(stats.count.file_count, 1);
//! ```

pub mod cache;
pub mod classify;
pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod git;
pub mod matcher;

pub use cache::{ResultCache, CACHE_TTL};
pub use config::Config;
pub use counter::{count, count_lines, FileInfo, LineCountResult};
pub use engine::{StatsEngine, WorkspaceStats};
pub use error::LocbarError;
pub use git::GitStats;
pub use matcher::ExcludeMatcher;

/// Result type for locbarlib operations
pub type Result<T> = std::result::Result<T, LocbarError>;
