//! Repository statistics via the git CLI.
//!
//! Every query shells out to `git` and degrades on failure: a missing
//! binary, a directory outside any repository, an unborn branch, or a
//! missing remote each zero out the specific figure they feed instead
//! of failing the whole refresh.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify;
use crate::config::Config;
use crate::counter::count_file;

/// Branch and diff statistics for one repository.
///
/// Recomputed on every refresh; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitStats {
    /// Current branch name (`HEAD` when detached)
    pub branch: String,
    /// Lines added on this branch since it diverged from trunk
    pub branch_additions: u64,
    /// Lines deleted on this branch since it diverged from trunk
    pub branch_deletions: u64,
    /// Staged plus unstaged additions
    pub working_additions: u64,
    /// Staged plus unstaged deletions
    pub working_deletions: u64,
    /// Total lines across untracked-and-not-ignored files
    pub untracked_lines: u64,
    /// Whether the current branch is the detected trunk
    pub is_main_branch: bool,
}

/// Run one git query under `root`. `None` on any failure.
fn run_git(root: &Path, args: &[&str]) -> Option<String> {
    match Command::new("git").arg("-C").arg(root).args(args).output() {
        Ok(out) if out.status.success() => Some(String::from_utf8_lossy(&out.stdout).into_owned()),
        Ok(out) => {
            debug!(
                ?args,
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "git query failed"
            );
            None
        }
        Err(err) => {
            debug!(%err, "cannot run git");
            None
        }
    }
}

/// Whether `root` is inside a git working tree.
pub fn is_repository(root: &Path) -> bool {
    run_git(root, &["rev-parse", "--is-inside-work-tree"])
        .is_some_and(|out| out.trim() == "true")
}

/// Commit id of HEAD, or `None` outside a repository or before the
/// first commit.
pub fn head_commit(root: &Path) -> Option<String> {
    run_git(root, &["rev-parse", "HEAD"])
        .map(|out| out.trim().to_string())
        .filter(|id| !id.is_empty())
}

/// Opaque digest of staged/unstaged/untracked state.
///
/// Changes whenever any tracked file's status changes or an untracked
/// file appears or disappears; callers compare it for equality only.
pub fn fingerprint(root: &Path) -> String {
    let status = run_git(root, &["status", "--porcelain"]).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    status.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Current branch name; `HEAD` when detached.
pub fn current_branch(root: &Path) -> Option<String> {
    run_git(root, &["rev-parse", "--abbrev-ref", "HEAD"])
        .map(|out| out.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Detect the trunk branch: local `main`, local `master`, then the
/// remote-tracking equivalents. `None` when no candidate exists.
fn trunk_ref(root: &Path) -> Option<String> {
    for (full, short) in [
        ("refs/heads/main", "main"),
        ("refs/heads/master", "master"),
        ("refs/remotes/origin/main", "origin/main"),
        ("refs/remotes/origin/master", "origin/master"),
    ] {
        if run_git(root, &["rev-parse", "--verify", "--quiet", full]).is_some() {
            return Some(short.to_string());
        }
    }
    None
}

/// Tracked plus untracked-but-not-ignored files, repo-relative with
/// forward slashes. `None` when `root` is not inside a repository.
pub fn list_workspace_files(root: &Path) -> Option<Vec<String>> {
    if !is_repository(root) {
        return None;
    }
    let tracked = run_git(root, &["ls-files", "-z"])?;
    let untracked =
        run_git(root, &["ls-files", "--others", "--exclude-standard", "-z"]).unwrap_or_default();
    Some(
        tracked
            .split('\0')
            .chain(untracked.split('\0'))
            .filter(|rel| !rel.is_empty())
            .map(String::from)
            .collect(),
    )
}

/// Untracked-and-not-ignored files, repo-relative.
pub fn untracked_files(root: &Path) -> Vec<String> {
    run_git(root, &["ls-files", "--others", "--exclude-standard", "-z"])
        .map(|out| {
            out.split('\0')
                .filter(|rel| !rel.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Sum the added/deleted columns of `git diff --numstat` output.
///
/// Binary entries show `-` in both columns and contribute nothing.
fn parse_numstat(output: &str) -> (u64, u64) {
    let mut additions = 0;
    let mut deletions = 0;
    for line in output.lines() {
        let mut parts = line.split('\t');
        let added: Option<u64> = parts.next().and_then(|s| s.parse().ok());
        let deleted: Option<u64> = parts.next().and_then(|s| s.parse().ok());
        if let (Some(a), Some(d)) = (added, deleted) {
            additions += a;
            deletions += d;
        }
    }
    (additions, deletions)
}

fn numstat(root: &Path, args: &[&str]) -> (u64, u64) {
    run_git(root, args)
        .map(|out| parse_numstat(&out))
        .unwrap_or((0, 0))
}

/// Total lines across untracked files, under the same extension,
/// binary, and counting rules as the line counter.
fn untracked_line_total(root: &Path, config: &Config) -> u64 {
    untracked_files(root)
        .iter()
        .filter(|rel| {
            let name = rel.rsplit('/').next().unwrap_or(rel);
            classify::should_include(name, &config.include_extensions)
        })
        .filter_map(|rel| count_file(&root.join(rel)))
        .sum()
}

/// Compute branch and diff statistics for a repository.
///
/// `None` when `root` is not inside a repository; that is a valid
/// state, not an error. Branch diff figures use a three-dot diff
/// against the trunk and appear only off-trunk.
pub fn stats(root: &Path, config: &Config) -> Option<GitStats> {
    if !is_repository(root) {
        return None;
    }

    let branch = current_branch(root).unwrap_or_else(|| "HEAD".to_string());
    let trunk = trunk_ref(root);
    let is_main_branch = trunk
        .as_deref()
        .map(|t| t.strip_prefix("origin/").unwrap_or(t))
        .is_some_and(|name| name == branch);

    let (branch_additions, branch_deletions) = match &trunk {
        Some(trunk) if !is_main_branch => {
            numstat(root, &["diff", "--numstat", &format!("{trunk}...HEAD")])
        }
        _ => (0, 0),
    };

    let (staged_add, staged_del) = numstat(root, &["diff", "--cached", "--numstat"]);
    let (unstaged_add, unstaged_del) = numstat(root, &["diff", "--numstat"]);

    Some(GitStats {
        branch,
        branch_additions,
        branch_deletions,
        working_additions: staged_add + unstaged_add,
        working_deletions: staged_del + unstaged_del,
        untracked_lines: untracked_line_total(root, config),
        is_main_branch,
    })
}
