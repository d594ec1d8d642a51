//! Rendering of workspace statistics: the compact status-bar summary
//! line and the detailed multi-section report.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use console::style;
use locbarlib::{Config, WorkspaceStats};

/// Line-count buckets for the size histogram.
const SIZE_BUCKETS: &[(u64, u64, &str)] = &[
    (0, 99, "0-99"),
    (100, 299, "100-299"),
    (300, 999, "300-999"),
    (1000, u64::MAX, "1000+"),
];

/// Format a count with thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// The compact one-line summary, status-bar style.
pub fn summary(stats: &WorkspaceStats, config: &Config) -> String {
    let mut line = format!(
        "{} lines in {} files",
        style(format_count(stats.count.total_lines)).bold(),
        format_count(stats.count.file_count)
    );

    if let Some(git) = &stats.git {
        let _ = write!(line, "  {} {}", style("on").dim(), style(&git.branch).cyan());
        if config.show_branch_stats && !git.is_main_branch {
            let _ = write!(
                line,
                " {}{} {}{}",
                style("+").green(),
                format_count(git.branch_additions),
                style("-").red(),
                format_count(git.branch_deletions)
            );
        }
        if config.show_working_changes {
            let dirty = git.working_additions + git.working_deletions + git.untracked_lines > 0;
            if dirty {
                let _ = write!(
                    line,
                    "  {} +{} -{} u{}",
                    style("changes:").dim(),
                    format_count(git.working_additions),
                    format_count(git.working_deletions),
                    format_count(git.untracked_lines)
                );
            }
        }
    }
    line
}

/// The detailed multi-section report: top files, extension and
/// directory breakdowns, size histogram, and recently modified files.
pub fn report(root: &Path, stats: &WorkspaceStats, config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", summary(stats, config));
    let _ = writeln!(out);

    top_files_section(&mut out, stats);
    extension_section(&mut out, stats);
    directory_section(&mut out, stats);
    histogram_section(&mut out, stats);
    recency_section(&mut out, root, stats);

    out
}

fn section_header(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", style(title).bold().underlined());
}

fn top_files_section(out: &mut String, stats: &WorkspaceStats) {
    section_header(out, "Top files");
    let mut files: Vec<_> = stats.count.files.iter().collect();
    files.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.path.cmp(&b.path)));
    for file in files.iter().take(10) {
        let _ = writeln!(out, "  {:>8}  {}", format_count(file.lines), file.path);
    }
    let _ = writeln!(out);
}

fn extension_section(out: &mut String, stats: &WorkspaceStats) {
    section_header(out, "By extension");
    let mut by_ext: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for file in &stats.count.files {
        let entry = by_ext.entry(file.extension.as_str()).or_default();
        entry.0 += file.lines;
        entry.1 += 1;
    }
    let mut rows: Vec<_> = by_ext.into_iter().collect();
    rows.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then_with(|| a.0.cmp(b.0)));
    for (ext, (lines, count)) in rows {
        let _ = writeln!(
            out,
            "  {:>8}  .{:<10} ({} files)",
            format_count(lines),
            ext,
            count
        );
    }
    let _ = writeln!(out);
}

fn directory_section(out: &mut String, stats: &WorkspaceStats) {
    section_header(out, "By directory");
    let mut by_dir: BTreeMap<&str, u64> = BTreeMap::new();
    for file in &stats.count.files {
        let dir = match file.path.split_once('/') {
            Some((first, _)) => first,
            None => ".",
        };
        *by_dir.entry(dir).or_default() += file.lines;
    }
    let mut rows: Vec<_> = by_dir.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    for (dir, lines) in rows {
        let _ = writeln!(out, "  {:>8}  {}/", format_count(lines), dir);
    }
    let _ = writeln!(out);
}

fn histogram_section(out: &mut String, stats: &WorkspaceStats) {
    section_header(out, "File sizes");
    for &(lo, hi, label) in SIZE_BUCKETS {
        let count = stats
            .count
            .files
            .iter()
            .filter(|f| f.lines >= lo && f.lines <= hi)
            .count();
        let bar = "#".repeat(count.min(40));
        let _ = writeln!(out, "  {label:>8}  {count:>4} {bar}");
    }
    let _ = writeln!(out);
}

/// Most recently modified counted files, mtimes read best-effort at
/// render time.
fn recency_section(out: &mut String, root: &Path, stats: &WorkspaceStats) {
    section_header(out, "Recently modified");
    let now = SystemTime::now();
    let mut recent: Vec<(&str, SystemTime)> = stats
        .count
        .files
        .iter()
        .filter_map(|f| {
            let modified = fs::metadata(root.join(&f.path)).and_then(|m| m.modified()).ok()?;
            Some((f.path.as_str(), modified))
        })
        .collect();
    recent.sort_by(|a, b| b.1.cmp(&a.1));
    for (path, modified) in recent.iter().take(5) {
        let age = now
            .duration_since(*modified)
            .map(|d| format_age(d.as_secs()))
            .unwrap_or_else(|_| "now".to_string());
        let _ = writeln!(out, "  {age:>8}  {path}");
    }
}

fn format_age(secs: u64) -> String {
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86400),
    }
}
