//! Error types for locbarlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while gathering workspace statistics.
///
/// Most failure modes (unreadable files, failed git queries, malformed
/// exclude patterns) degrade in place and never surface here; the only
/// fatal condition is not being able to access the workspace root.
#[derive(Error, Debug)]
pub enum LocbarError {
    /// Workspace root does not exist or is not a directory
    #[error("workspace root not found: {0}")]
    WorkspaceNotFound(PathBuf),
}
