//! File classification: which files qualify for counting, and which
//! are binary and therefore excluded.

use std::collections::BTreeSet;
use std::path::Path;

/// How many leading bytes are sampled for binary detection.
pub const BINARY_SAMPLE_BYTES: usize = 8000;

/// Fraction of non-printable bytes above which content is binary.
const NON_PRINTABLE_THRESHOLD: f64 = 0.30;

/// Sentinel extension reported for extensionless files.
pub const NO_EXTENSION: &str = "none";

/// Conventional project files counted despite having no extension.
const EXTENSIONLESS_ALLOWED: &[&str] = &[
    "Makefile",
    "makefile",
    "Dockerfile",
    "Containerfile",
    "Justfile",
    "justfile",
    "Rakefile",
    "Gemfile",
    "Procfile",
    "Vagrantfile",
    "Jenkinsfile",
];

/// Build manifests counted by exact name even though they carry an
/// extension the config may not list.
const NAMED_ALLOWED: &[&str] = &["CMakeLists.txt"];

/// Extensions that are binary by definition; content is never sampled.
const BINARY_EXTENSIONS: &[&str] = &[
    "7z", "a", "avi", "bin", "bmp", "bz2", "class", "db", "dll", "dylib", "eot", "exe", "flac",
    "gif", "gz", "ico", "jar", "jpeg", "jpg", "mkv", "mov", "mp3", "mp4", "o", "ogg", "otf",
    "pdf", "png", "pyc", "rar", "so", "sqlite", "tar", "tiff", "ttf", "war", "wasm", "webp",
    "woff", "woff2", "xz", "zip",
];

/// The lowercased extension of a filename, without the leading dot.
///
/// Dotfiles like `.gitignore` have no extension. Returns `None` for
/// extensionless names.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Whether a filename qualifies for counting under the configured
/// extension set.
///
/// Files with an extension pass iff the extension is configured;
/// extensionless files pass only via the conventional allow-list.
/// A few conventional manifests pass by exact name regardless.
pub fn should_include(filename: &str, include_extensions: &BTreeSet<String>) -> bool {
    if NAMED_ALLOWED.contains(&filename) {
        return true;
    }
    match extension_of(filename) {
        Some(ext) => include_extensions.contains(&ext),
        None => EXTENSIONLESS_ALLOWED.contains(&filename),
    }
}

/// Whether an extension is in the well-known binary table.
pub fn is_binary_extension(ext: &str) -> bool {
    BINARY_EXTENSIONS.contains(&ext)
}

/// Whether a path's extension marks it binary without reading content.
pub fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| is_binary_extension(&e.to_lowercase()))
}

/// Classify sampled content as binary.
///
/// Binary means: any NUL byte, or more than 30% of the sample being
/// control bytes other than tab, newline, and carriage return. Callers
/// pass at most the first [`BINARY_SAMPLE_BYTES`] of the file.
pub fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    let mut non_printable = 0usize;
    for &b in sample {
        if b == 0 {
            return true;
        }
        if b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r' {
            non_printable += 1;
        }
    }
    (non_printable as f64) / (sample.len() as f64) > NON_PRINTABLE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extension_lowercased() {
        assert_eq!(extension_of("Main.RS").as_deref(), Some("rs"));
        assert_eq!(extension_of("app.min.js").as_deref(), Some("js"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of(".gitignore"), None);
    }

    #[test]
    fn test_include_by_extension() {
        let set = exts(&["rs", "py"]);
        assert!(should_include("main.rs", &set));
        assert!(should_include("MAIN.RS", &set));
        assert!(!should_include("main.go", &set));
    }

    #[test]
    fn test_extensionless_allow_list() {
        let set = exts(&["rs"]);
        assert!(should_include("Makefile", &set));
        assert!(should_include("Dockerfile", &set));
        assert!(!should_include("LICENSE", &set));
        assert!(!should_include(".gitignore", &set));
    }

    #[test]
    fn test_named_allow_list() {
        let set = exts(&["rs"]);
        // Counted by exact name even though txt is not configured
        assert!(should_include("CMakeLists.txt", &set));
        assert!(!should_include("notes.txt", &set));
    }

    #[test]
    fn test_binary_extension_table() {
        assert!(is_binary_extension("png"));
        assert!(is_binary_extension("wasm"));
        assert!(!is_binary_extension("rs"));
        assert!(has_binary_extension(Path::new("logo.PNG")));
        assert!(!has_binary_extension(Path::new("main.rs")));
    }

    #[test]
    fn test_looks_binary_null_byte() {
        assert!(looks_binary(b"hello\0world"));
        assert!(!looks_binary(b"hello world\n"));
    }

    #[test]
    fn test_looks_binary_control_density() {
        // 4 of 8 bytes are control chars, above the 30% threshold
        assert!(looks_binary(&[0x01, 0x02, 0x03, 0x04, b'a', b'b', b'c', b'd']));
        // Tab/newline/CR do not count as non-printable
        assert!(!looks_binary(b"a\tb\nc\rd"));
    }

    #[test]
    fn test_looks_binary_empty() {
        assert!(!looks_binary(b""));
    }
}
