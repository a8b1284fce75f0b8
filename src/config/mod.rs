//! Configuration handling for umdpack
//!
//! Holds the package, source and output settings of a build and resolves
//! them against a base directory. Settings can come from code, from CLI
//! flags, or from an `umdpack.toml` file.

mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BuildError, Result};
use crate::utils::{normalize_path, resolve_path};

pub use schema::*;

/// Settings for a single package build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Absolute directory every relative setting resolves against
    base_path: PathBuf,

    package_name: String,
    package_path: String,
    source_path: String,
    output_path: String,
}

impl BuildConfig {
    /// Create a configuration rooted at `base_path` with default sub-paths
    ///
    /// The package path starts empty and must be set before building.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let base_path = std::path::absolute(&base_path).unwrap_or(base_path);

        Self {
            base_path: normalize_path(&base_path),
            package_name: String::new(),
            package_path: String::new(),
            source_path: DEFAULT_SOURCE_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }

    /// Load configuration from an umdpack.toml file
    ///
    /// The directory containing the file becomes the base path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let canonical_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| BuildError::io(path, e))?
                .join(path)
        };

        let content = fs::read_to_string(&canonical_path)
            .map_err(|e| BuildError::io(&canonical_path, e))?;

        let file: ConfigFile = toml::from_str(&content).map_err(|source| BuildError::Config {
            path: canonical_path.clone(),
            source,
        })?;

        let root = canonical_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = Self::new(root);
        config.apply_file(&file)?;

        debug!("Loaded configuration from {}", canonical_path.display());

        Ok(config)
    }

    /// Apply every setting present in a parsed config file
    pub fn apply_file(&mut self, file: &ConfigFile) -> Result<&mut Self> {
        for (setting, value) in file.package.entries() {
            self.set_value(setting, Some(value))?;
        }
        Ok(self)
    }

    /// Set a setting from a loosely typed value
    ///
    /// `None` resets the setting to empty. Anything other than a string
    /// fails with [`BuildError::InvalidArgument`].
    pub fn set_value(&mut self, setting: Setting, value: Option<&toml::Value>) -> Result<&mut Self> {
        let value = match value {
            None => None,
            Some(toml::Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(BuildError::InvalidArgument {
                    field: setting.name(),
                    found: other.type_str().to_string(),
                })
            }
        };

        let slot = match setting {
            Setting::PackageName => &mut self.package_name,
            Setting::PackagePath => &mut self.package_path,
            Setting::SourcePath => &mut self.source_path,
            Setting::OutputPath => &mut self.output_path,
        };
        *slot = value.unwrap_or_default();

        Ok(self)
    }

    /// Directory relative settings resolve against
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Name override for the output manifest (empty when unset)
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn set_package_name<S: Into<String>>(&mut self, value: Option<S>) -> &mut Self {
        self.package_name = value.map(Into::into).unwrap_or_default();
        self
    }

    /// Absolute package root
    pub fn package_path(&self) -> PathBuf {
        resolve_path(&self.base_path, &[&self.package_path])
    }

    pub fn set_package_path<S: Into<String>>(&mut self, value: Option<S>) -> &mut Self {
        self.package_path = value.map(Into::into).unwrap_or_default();
        self
    }

    /// Absolute source directory
    pub fn source_path(&self) -> PathBuf {
        resolve_path(&self.base_path, &[&self.package_path, &self.source_path])
    }

    pub fn set_source_path<S: Into<String>>(&mut self, value: Option<S>) -> &mut Self {
        self.source_path = value.map(Into::into).unwrap_or_default();
        self
    }

    /// Absolute output directory
    pub fn output_path(&self) -> PathBuf {
        resolve_path(&self.base_path, &[&self.package_path, &self.output_path])
    }

    pub fn set_output_path<S: Into<String>>(&mut self, value: Option<S>) -> &mut Self {
        self.output_path = value.map(Into::into).unwrap_or_default();
        self
    }

    /// Ensure every required path is set
    pub fn validate(&self) -> Result<()> {
        let required = [
            (Setting::PackagePath, &self.package_path),
            (Setting::SourcePath, &self.source_path),
            (Setting::OutputPath, &self.output_path),
        ];

        for (setting, value) in required {
            if value.is_empty() {
                return Err(BuildError::MissingSetting {
                    field: setting.name(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BuildConfig {
        let mut config = BuildConfig::new("/work/tools");
        config.set_package_path(Some(".."));
        config
    }

    #[test]
    fn test_defaults() {
        let config = BuildConfig::new("/work");
        assert_eq!(config.package_name(), "");
        assert_eq!(config.source_path(), PathBuf::from("/work/src"));
        assert_eq!(config.output_path(), PathBuf::from("/work/lib"));
        assert!(matches!(
            config.validate(),
            Err(BuildError::MissingSetting { field: "packagePath" })
        ));
    }

    #[test]
    fn test_resolution() {
        let config = config();
        assert_eq!(config.package_path(), PathBuf::from("/work"));
        assert_eq!(config.source_path(), PathBuf::from("/work/src"));
        assert_eq!(config.output_path(), PathBuf::from("/work/lib"));
        // resolving twice yields the same answer
        assert_eq!(config.output_path(), config.output_path());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reset_to_empty() {
        let mut config = config();
        config.set_source_path(None::<String>);
        assert_eq!(config.source_path(), PathBuf::from("/work"));
        assert!(matches!(
            config.validate(),
            Err(BuildError::MissingSetting { field: "sourcePath" })
        ));

        config.set_package_name(Some("pkg")).set_package_name(None::<&str>);
        assert_eq!(config.package_name(), "");
    }

    #[test]
    fn test_set_value_rejects_non_strings() {
        let mut config = config();
        let err = config
            .set_value(Setting::OutputPath, Some(&toml::Value::Integer(3)))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidArgument { field: "outputPath", ref found } if found == "integer"
        ));
        // unchanged after the failed set
        assert_eq!(config.output_path(), PathBuf::from("/work/lib"));

        config
            .set_value(Setting::OutputPath, Some(&toml::Value::String("dist".into())))
            .unwrap();
        assert_eq!(config.output_path(), PathBuf::from("/work/dist"));
    }

    #[test]
    fn test_apply_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            [package]
            name = "@scope/widgets"
            path = "pkg"
            output = "dist"
            "#,
        )
        .unwrap();

        let mut config = BuildConfig::new("/repo");
        config.apply_file(&file).unwrap();

        assert_eq!(config.package_name(), "@scope/widgets");
        assert_eq!(config.package_path(), PathBuf::from("/repo/pkg"));
        assert_eq!(config.source_path(), PathBuf::from("/repo/pkg/src"));
        assert_eq!(config.output_path(), PathBuf::from("/repo/pkg/dist"));
    }

    #[test]
    fn test_apply_file_invalid_type() {
        let file: ConfigFile = toml::from_str("[package]\nsource = true\n").unwrap();
        let mut config = BuildConfig::new("/repo");
        let err = config.apply_file(&file).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("sourcePath"));
    }

    #[test]
    fn test_load_uses_file_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[package]\npath = \".\"\n").unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.package_path(), normalize_path(dir.path()));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[package\n").unwrap();

        assert!(matches!(BuildConfig::load(&path), Err(BuildError::Config { .. })));
    }
}
