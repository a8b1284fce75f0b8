//! Local dependency rewriting
//!
//! `file:` specifiers are relative to the package root. Once the manifest
//! is written into the output directory they have to be re-expressed
//! relative to that directory instead.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::utils::{relative_path, resolve_path, to_forward_slashes};

/// Dependency name to version-or-path specifier
pub type DependencyMap = Map<String, Value>;

/// Marker prefix of a local path specifier
pub const FILE_SPECIFIER: &str = "file:";

/// Rewrite `file:` specifiers from `source_anchor` to `dest_anchor`
///
/// Both anchors must be absolute. Every other entry is copied unchanged.
pub fn normalize_dependencies(
    dependencies: &DependencyMap,
    source_anchor: &Path,
    dest_anchor: &Path,
) -> DependencyMap {
    dependencies
        .iter()
        .map(|(name, spec)| {
            let rewritten = spec
                .as_str()
                .and_then(|s| s.strip_prefix(FILE_SPECIFIER))
                .map(|local| rebase_local_path(local, source_anchor, dest_anchor));

            match rewritten {
                Some(local) => {
                    debug!("Rewrote dependency {}: {} -> {}", name, spec, local);
                    (name.clone(), Value::String(local))
                }
                None => (name.clone(), spec.clone()),
            }
        })
        .collect()
}

fn rebase_local_path(local: &str, source_anchor: &Path, dest_anchor: &Path) -> String {
    let target = resolve_path(source_anchor, &[local]);
    let relative = relative_path(dest_anchor, &target).unwrap_or(target);
    format!("{}{}", FILE_SPECIFIER, to_forward_slashes(&relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deps(value: Value) -> DependencyMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_rewrites_one_level_deeper() {
        let input = deps(json!({ "shared": "file:../shared" }));
        let output = normalize_dependencies(&input, Path::new("/repo/pkg"), Path::new("/repo/pkg/lib"));
        assert_eq!(output["shared"], json!("file:../../shared"));
    }

    #[test]
    fn test_rewritten_path_reaches_same_target() {
        let source = Path::new("/repo/packages/app");
        let dest = Path::new("/repo/packages/app/build/lib");
        let input = deps(json!({ "util": "file:../util/./core" }));

        let output = normalize_dependencies(&input, source, dest);
        let rewritten = output["util"].as_str().unwrap();
        let local = rewritten.strip_prefix(FILE_SPECIFIER).unwrap();

        assert_eq!(
            resolve_path(dest, &[local]),
            resolve_path(source, &["../util/core"])
        );
    }

    #[test]
    fn test_other_entries_unchanged() {
        let input = deps(json!({
            "left-pad": "^1.3.0",
            "tarball": "https://example.com/x.tgz",
            "odd": 5,
            "local": "file:./vendor/x"
        }));
        let output = normalize_dependencies(&input, Path::new("/p"), Path::new("/p/lib"));

        assert_eq!(output["left-pad"], json!("^1.3.0"));
        assert_eq!(output["tarball"], json!("https://example.com/x.tgz"));
        assert_eq!(output["odd"], json!(5));
        assert_eq!(output["local"], json!("file:../vendor/x"));
        // input is left alone
        assert_eq!(input["local"], json!("file:./vendor/x"));
    }

    #[test]
    fn test_preserves_order() {
        let input = deps(json!({ "zeta": "1", "alpha": "file:../a", "mid": "2" }));
        let output = normalize_dependencies(&input, Path::new("/p"), Path::new("/p/lib"));
        let keys: Vec<&str> = output.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_absolute_and_identical_targets() {
        let input = deps(json!({ "abs": "file:/opt/lib/x", "self": "file:lib" }));
        let output = normalize_dependencies(&input, Path::new("/p"), Path::new("/p/lib"));
        assert_eq!(output["abs"], json!("file:../../opt/lib/x"));
        assert_eq!(output["self"], json!("file:"));
    }
}
