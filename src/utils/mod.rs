//! Utility functions and helpers

use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

/// Line ending used for every generated file
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Extension every transpiled file carries
pub const SCRIPT_EXTENSION: &str = ".js";

/// Order names case-insensitively, breaking ties with exact ordering
pub fn alphabetical_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort file names in the order every build step enumerates them
pub fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| alphabetical_cmp(a, b));
}

/// Check for a trailing `.js`, ignoring case
pub fn has_script_extension(name: &str) -> bool {
    let ext_len = SCRIPT_EXTENSION.len();
    name.len() >= ext_len
        && name.is_char_boundary(name.len() - ext_len)
        && name[name.len() - ext_len..].eq_ignore_ascii_case(SCRIPT_EXTENSION)
}

/// Strip a trailing `.js` (any case), if present
pub fn strip_script_extension(name: &str) -> &str {
    if has_script_extension(name) {
        &name[..name.len() - SCRIPT_EXTENSION.len()]
    } else {
        name
    }
}

/// Destination file name for a source file name
pub fn script_file_name(name: &str) -> String {
    if has_script_extension(name) {
        name.to_string()
    } else {
        format!("{}{}", name, SCRIPT_EXTENSION)
    }
}

/// Lexically remove `.` and `..` components
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => result.push(component.as_os_str()),
            Component::CurDir => continue,
            Component::ParentDir => {
                if depth > 0 {
                    result.pop();
                    depth -= 1;
                } else if !path.has_root() {
                    result.push("..");
                }
            }
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
        }
    }

    result
}

/// Join segments onto a base the way a shell `cd` would, then normalize
///
/// Absolute segments replace everything before them; empty ones are ignored.
pub fn resolve_path<S: AsRef<Path>>(base: &Path, segments: &[S]) -> PathBuf {
    let mut joined = base.to_path_buf();
    for segment in segments {
        let segment = segment.as_ref();
        if !segment.as_os_str().is_empty() {
            joined.push(segment);
        }
    }
    normalize_path(&joined)
}

/// Get relative path from base to target
pub fn relative_path(from: &Path, to: &Path) -> Option<PathBuf> {
    pathdiff::diff_paths(to, from)
}

/// Convert directory separators to forward slashes
pub fn to_forward_slashes(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// Generate a hash of the given content
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format duration as human-readable string
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();

    if secs >= 1.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.0}ms", secs * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabetical_order() {
        let mut names = vec!["B.js".to_string(), "a.js".to_string(), "A.js".to_string()];
        sort_names(&mut names);
        assert_eq!(names, ["A.js", "a.js", "B.js"]);
    }

    #[test]
    fn test_alphabetical_ties_break_exactly() {
        assert_eq!(alphabetical_cmp("a.js", "A.js"), Ordering::Greater);
        assert_eq!(alphabetical_cmp("a.js", "b.js"), Ordering::Less);
        assert_eq!(alphabetical_cmp("Zed.js", "apple.js"), Ordering::Greater);
        assert_eq!(alphabetical_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_script_extension() {
        assert!(has_script_extension("foo.js"));
        assert!(has_script_extension("FOO.JS"));
        assert!(!has_script_extension("foo.json"));
        assert!(!has_script_extension("js"));
        assert_eq!(strip_script_extension("Foo.Js"), "Foo");
        assert_eq!(strip_script_extension("README"), "README");
        assert_eq!(script_file_name("data.txt"), "data.txt.js");
        assert_eq!(script_file_name("main.JS"), "main.JS");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/foo/./bar/../baz")), PathBuf::from("/foo/baz"));
        assert_eq!(normalize_path(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/work/tools");
        assert_eq!(resolve_path(base, &["..", "src"]), PathBuf::from("/work/src"));
        assert_eq!(resolve_path(base, &["", "lib"]), PathBuf::from("/work/tools/lib"));
        assert_eq!(resolve_path(base, &["/abs", "lib"]), PathBuf::from("/abs/lib"));
    }

    #[test]
    fn test_relative_path() {
        let rel = relative_path(Path::new("/p/lib"), Path::new("/shared")).unwrap();
        assert_eq!(to_forward_slashes(&rel), "../../shared");
    }

    #[test]
    fn test_hash_content() {
        let hash = hash_content(b"hello world");
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
    }

    #[test]
    fn test_format_duration() {
        use std::time::Duration;

        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs_f64(1.5)), "1.50s");
    }
}
