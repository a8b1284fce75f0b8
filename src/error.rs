//! Error types for umdpack

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors raised while configuring or running a package build
#[derive(Error, Debug)]
pub enum BuildError {
    /// A setting received a value that is neither a string nor empty
    #[error("parameter {field} must be of type string, found {found}")]
    InvalidArgument { field: &'static str, found: String },

    /// A required path setting is empty at build start
    #[error("must set {field}")]
    MissingSetting { field: &'static str },

    /// A filesystem primitive failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input manifest is not valid JSON
    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Input manifest parsed, but is not a JSON object
    #[error("manifest {path} must contain a JSON object")]
    ManifestShape { path: PathBuf },

    /// umdpack.toml is not valid TOML
    #[error("failed to parse config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Output manifest serialization failed
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for configuration-time failures that happen before any I/O
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BuildError::InvalidArgument { .. } | BuildError::MissingSetting { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = BuildError::MissingSetting { field: "packagePath" };
        assert_eq!(err.to_string(), "must set packagePath");
        assert!(err.is_configuration());

        let err = BuildError::InvalidArgument {
            field: "sourcePath",
            found: "integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parameter sourcePath must be of type string, found integer"
        );
    }

    #[test]
    fn test_io_keeps_path() {
        let err = BuildError::io(
            "/tmp/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing"));
        assert!(!err.is_configuration());
    }
}
