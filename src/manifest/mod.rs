//! Package manifest handling
//!
//! Reads the package's `package.json` and derives the manifest shipped in
//! the output directory from it.

mod dependencies;

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{BuildError, Result};
use crate::utils::LINE_ENDING;

pub use dependencies::{normalize_dependencies, DependencyMap, FILE_SPECIFIER};

/// Manifest file name, both in the package root and in the output
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// `main` of every synthesized manifest
pub const ENTRY_MAIN: &str = "./index.js";

/// Keys copied into the output manifest, in output order
pub const MANIFEST_FIELDS: [&str; 8] = [
    "name",
    "version",
    "description",
    "author",
    "license",
    "repository",
    "main",
    "dependencies",
];

/// A parsed input manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Where the manifest was read from
    path: PathBuf,

    fields: Map<String, Value>,
}

impl Manifest {
    /// Read `package.json` from a package root
    pub async fn load(package_path: &Path) -> Result<Self> {
        let path = package_path.join(MANIFEST_FILE_NAME);
        debug!("Loading manifest {}", path.display());

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| BuildError::io(&path, e))?;

        Self::parse(path, &content)
    }

    /// Parse manifest text
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let value: Value = serde_json::from_str(content).map_err(|source| BuildError::ManifestParse {
            path: path.clone(),
            source,
        })?;

        let Value::Object(fields) = value else {
            return Err(BuildError::ManifestShape { path });
        };

        let manifest = Self { path, fields };
        if let Some(version) = manifest.version().and_then(Value::as_str) {
            if semver::Version::parse(version).is_err() {
                warn!(
                    "Version {:?} in {} is not a valid semantic version",
                    version,
                    manifest.path.display()
                );
            }
        }

        Ok(manifest)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&Value> {
        self.get("version")
    }

    /// Declared dependencies, when they form an object
    pub fn dependencies(&self) -> Option<&DependencyMap> {
        self.get("dependencies").and_then(Value::as_object)
    }
}

/// JavaScript truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Build the output manifest
///
/// `name_override` wins over the input name when non-empty. `dependencies`
/// replaces the input dependencies when given; callers pass the
/// normalized map.
pub fn synthesize(
    manifest: &Manifest,
    name_override: &str,
    dependencies: Option<DependencyMap>,
) -> Map<String, Value> {
    let mut output = Map::new();
    let mut dependencies = dependencies;

    for key in MANIFEST_FIELDS {
        let value = manifest.get(key);
        let field = match key {
            "name" if !name_override.is_empty() => Some(Value::String(name_override.to_string())),
            "name" => value.cloned(),
            "main" => Some(Value::String(ENTRY_MAIN.to_string())),
            "dependencies" if value.is_some_and(is_truthy) => dependencies
                .take()
                .map(Value::Object)
                .or_else(|| value.cloned()),
            _ => value.filter(|v| is_truthy(v)).cloned(),
        };

        if let Some(field) = field {
            output.insert(key.to_string(), field);
        }
    }

    output
}

/// Serialize a manifest the way it is written to disk
pub fn to_manifest_text(fields: &Map<String, Value>) -> Result<String> {
    let json = serde_json::to_string_pretty(fields)?;
    let mut text = json.replace('\n', LINE_ENDING);
    text.push_str(LINE_ENDING);
    Ok(text)
}
