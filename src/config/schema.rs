//! Configuration schema definitions

use serde::Deserialize;

/// Default source directory, relative to the package path
pub const DEFAULT_SOURCE_PATH: &str = "src";

/// Default output directory, relative to the package path
pub const DEFAULT_OUTPUT_PATH: &str = "lib";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "umdpack.toml";

/// Contents of an umdpack.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Package settings
    #[serde(default)]
    pub package: PackageSection,
}

/// The `[package]` table
///
/// Values stay loosely typed so that the setters can reject non-strings
/// with a field-specific error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageSection {
    /// Override for the output manifest name
    #[serde(default)]
    pub name: Option<toml::Value>,

    /// Package root, relative to the config file
    #[serde(default)]
    pub path: Option<toml::Value>,

    /// Source directory, relative to the package root
    #[serde(default)]
    pub source: Option<toml::Value>,

    /// Output directory, relative to the package root
    #[serde(default)]
    pub output: Option<toml::Value>,
}

/// A string setting of [`super::BuildConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    PackageName,
    PackagePath,
    SourcePath,
    OutputPath,
}

impl Setting {
    /// Name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Setting::PackageName => "packageName",
            Setting::PackagePath => "packagePath",
            Setting::SourcePath => "sourcePath",
            Setting::OutputPath => "outputPath",
        }
    }
}

impl PackageSection {
    /// Settings present in this table, in application order
    pub fn entries(&self) -> Vec<(Setting, &toml::Value)> {
        [
            (Setting::PackageName, self.name.as_ref()),
            (Setting::PackagePath, self.path.as_ref()),
            (Setting::SourcePath, self.source.as_ref()),
            (Setting::OutputPath, self.output.as_ref()),
        ]
        .into_iter()
        .filter_map(|(setting, value)| value.map(|v| (setting, v)))
        .collect()
    }
}
