//! Line counting over a workspace tree.
//!
//! Two enumeration strategies, chosen automatically: inside a git
//! repository the file list comes from git itself (tracked plus
//! untracked-but-not-ignored, so the repository's ignore rules apply
//! and the user's exclude globs do not); everywhere else a recursive
//! walk applies the exclude globs and prunes excluded directories.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::classify;
use crate::config::Config;
use crate::error::LocbarError;
use crate::git;
use crate::matcher::{normalize, ExcludeMatcher};
use crate::Result;

/// Per-file counting result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Workspace-relative path, forward-slash normalized
    pub path: String,
    /// Line count under the terminator-counting convention
    pub lines: u64,
    /// Lowercased extension without dot, or `"none"`
    pub extension: String,
}

/// Aggregate counting result for one workspace root.
///
/// Immutable once built; the cache hands out shared references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCountResult {
    /// Sum of every included file's lines
    pub total_lines: u64,
    /// Number of included files
    pub file_count: u64,
    /// Per-file breakdown, in discovery order
    pub files: Vec<FileInfo>,
}

/// Count line terminators in file content.
///
/// This is the authoritative counting contract: the count equals the
/// number of newline bytes. A CRLF pair counts once (the CR is not a
/// separate terminator), and content without any terminator, including
/// the empty file, counts as 0. `"a\nb\nc"` is 2; `"a\nb\nc\n"` is 3.
pub fn count_lines(content: &[u8]) -> u64 {
    content.iter().filter(|&&b| b == b'\n').count() as u64
}

/// Read one file and count its lines.
///
/// Returns `None` for binary files (extension table first, then an
/// 8000-byte content sample) and for unreadable files, which are
/// skipped rather than failing the surrounding count.
pub fn count_file(path: &Path) -> Option<u64> {
    if classify::has_binary_extension(path) {
        return None;
    }
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), %err, "skipping unreadable file");
            return None;
        }
    };
    let sample = &content[..content.len().min(classify::BINARY_SAMPLE_BYTES)];
    if classify::looks_binary(sample) {
        debug!(path = %path.display(), "skipping binary file");
        return None;
    }
    Some(count_lines(&content))
}

/// Count lines across a workspace.
///
/// Fails only when `root` itself is inaccessible; individual file or
/// subtree read failures are swallowed and those files are omitted.
pub fn count(root: &Path, config: &Config) -> Result<LineCountResult> {
    if !root.is_dir() {
        return Err(LocbarError::WorkspaceNotFound(root.to_path_buf()));
    }

    let files = match git::list_workspace_files(root) {
        Some(listed) => collect_listed(root, listed, config),
        None => collect_walked(root, config),
    };

    let mut result = LineCountResult::default();
    for file in files {
        result.total_lines += file.lines;
        result.file_count += 1;
        result.files.push(file);
    }
    info!(
        root = %root.display(),
        files = result.file_count,
        lines = result.total_lines,
        "counted workspace"
    );
    Ok(result)
}

/// Git-listed enumeration: repository ignore rules already applied,
/// so only the extension/name filter and binary filter run here.
fn collect_listed(root: &Path, listed: Vec<String>, config: &Config) -> Vec<FileInfo> {
    listed
        .into_iter()
        .filter_map(|rel| {
            if !classify::should_include(file_name(&rel), &config.include_extensions) {
                return None;
            }
            file_info(root, rel)
        })
        .collect()
}

/// Filesystem-walk fallback: exclude globs apply per relative path,
/// and excluded directories are pruned rather than descended into.
fn collect_walked(root: &Path, config: &Config) -> Vec<FileInfo> {
    let matcher = ExcludeMatcher::new(&config.exclude_patterns);
    let mut files = Vec::new();

    let walker = WalkDir::new(root).follow_links(false).into_iter();
    for entry in walker.filter_entry(|e| {
        if e.depth() == 0 {
            return true;
        }
        if e.file_type().is_dir() && e.file_name() == ".git" {
            return false;
        }
        !matcher.is_excluded(&relative_to(root, e.path()))
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!(%err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = relative_to(root, entry.path());
        if !classify::should_include(file_name(&rel), &config.include_extensions) {
            continue;
        }
        if let Some(info) = file_info(root, rel) {
            files.push(info);
        }
    }
    files
}

fn file_info(root: &Path, rel: String) -> Option<FileInfo> {
    let lines = count_file(&root.join(&rel))?;
    let extension = classify::extension_of(file_name(&rel))
        .unwrap_or_else(|| classify::NO_EXTENSION.to_string());
    Some(FileInfo {
        path: rel,
        lines,
        extension,
    })
}

fn file_name(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

fn relative_to(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize(&rel.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_count_lines_convention() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"no terminator"), 0);
        assert_eq!(count_lines(b"a\nb\nc"), 2);
        assert_eq!(count_lines(b"a\nb\nc\n"), 3);
        // CRLF counts once per pair
        assert_eq!(count_lines(b"a\r\nb\r\n"), 2);
        assert_eq!(count_lines(b"\n\n\n"), 3);
    }

    #[test]
    fn test_count_walk_mode() {
        let temp = tempdir().unwrap();
        write(temp.path(), "src/main.rs", "fn main() {}\n");
        write(temp.path(), "src/lib.rs", "pub fn f() {}\n// two\n");
        write(temp.path(), "README.md", "# title\n");
        write(temp.path(), "notes.txt", "not counted\n");

        let result = count(temp.path(), &Config::default()).unwrap();
        assert_eq!(result.file_count, 3);
        assert_eq!(result.total_lines, 4);
        assert!(result.files.iter().all(|f| f.path != "notes.txt"));
    }

    #[test]
    fn test_count_idempotent() {
        let temp = tempdir().unwrap();
        write(temp.path(), "a.rs", "one\ntwo\n");
        write(temp.path(), "b/c.py", "x = 1\n");

        let config = Config::default();
        let first = count(temp.path(), &config).unwrap();
        let second = count(temp.path(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exclude_patterns_prune_walk() {
        let temp = tempdir().unwrap();
        write(temp.path(), "src/app.rs", "fn f() {}\n");
        write(temp.path(), "node_modules/pkg/index.js", "x\n");
        write(temp.path(), "dist/bundle.min.js", "y\n");

        let result = count(temp.path(), &Config::default()).unwrap();
        assert_eq!(result.file_count, 1);
        assert_eq!(result.files[0].path, "src/app.rs");
    }

    #[test]
    fn test_extension_filter_and_allow_list() {
        let temp = tempdir().unwrap();
        write(temp.path(), "Makefile", "all:\n\techo hi\n");
        write(temp.path(), "CMakeLists.txt", "project(x)\n");
        write(temp.path(), "LICENSE", "MIT\n");
        write(temp.path(), "notes.txt", "scratch\n");
        write(temp.path(), "main.rs", "fn main() {}\n");

        let result = count(temp.path(), &Config::default()).unwrap();
        let paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"Makefile"));
        assert!(paths.contains(&"CMakeLists.txt"));
        assert!(paths.contains(&"main.rs"));
        assert!(!paths.contains(&"LICENSE"));
        assert!(!paths.contains(&"notes.txt"));
    }

    #[test]
    fn test_binary_file_excluded() {
        let temp = tempdir().unwrap();
        write(temp.path(), "code.rs", "fn f() {}\n");
        // Allow-listed extension but NUL byte in content
        fs::write(temp.path().join("blob.rs"), b"fn f() {}\0\n").unwrap();

        let result = count(temp.path(), &Config::default()).unwrap();
        assert_eq!(result.file_count, 1);
        assert_eq!(result.files[0].path, "code.rs");
    }

    #[test]
    fn test_extension_field() {
        let temp = tempdir().unwrap();
        write(temp.path(), "Main.RS", "x\n");
        write(temp.path(), "Makefile", "all:\n");

        let result = count(temp.path(), &Config::default()).unwrap();
        for file in &result.files {
            match file.path.as_str() {
                "Main.RS" => assert_eq!(file.extension, "rs"),
                "Makefile" => assert_eq!(file.extension, classify::NO_EXTENSION),
                other => panic!("unexpected file {other}"),
            }
        }
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let result = count(Path::new("/nonexistent/workspace"), &Config::default());
        assert!(matches!(result, Err(LocbarError::WorkspaceNotFound(_))));
    }

    #[test]
    fn test_empty_workspace() {
        let temp = tempdir().unwrap();
        let result = count(temp.path(), &Config::default()).unwrap();
        assert_eq!(result.total_lines, 0);
        assert_eq!(result.file_count, 0);
        assert!(result.files.is_empty());
    }
}
