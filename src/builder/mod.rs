//! Package build orchestration
//!
//! A build runs a fixed sequence of steps against the configured package:
//! clean the output directory, create it, transpile every source file,
//! write the aggregate entry and the derived manifest, then copy the
//! README and LICENSE when present. Steps run one at a time; the first
//! failure stops the build and whatever was already written stays.

mod entry;
mod step;

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::BuildConfig;
use crate::error::Result;
use crate::fs;
use crate::manifest::{self, normalize_dependencies, Manifest, MANIFEST_FILE_NAME};
use crate::transform::Transformer;
use crate::utils::{hash_content, script_file_name, sort_names};

pub use entry::{entry_body, generate_entry, ENTRY_FILE_NAME};
pub use step::{BuildState, BuildStep};

/// README file copied from the package root
pub const README_FILE_NAME: &str = "README.md";

/// LICENSE file copied from the package root
pub const LICENSE_FILE_NAME: &str = "LICENSE";

/// A file written to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Name relative to the output directory
    pub name: String,

    /// Absolute output path
    pub path: PathBuf,

    /// Bytes written
    pub size: u64,

    /// SHA-256 of the written content
    pub digest: String,
}

/// Source file to output file name mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    pub source: String,
    pub output: String,
}

/// Result of a successful build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Every artifact, in the order it was written
    pub artifacts: Vec<Artifact>,

    /// Transpiled files, in build order
    pub transpiled: Vec<FileMapping>,

    /// Header placed atop the aggregate entry, if any
    pub entry_header: Option<String>,
}

impl BuildReport {
    /// Digest identifying the complete output
    ///
    /// Two builds of the same package produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut buffer = String::new();
        for artifact in &self.artifacts {
            buffer.push_str(&artifact.name);
            buffer.push('\0');
            buffer.push_str(&artifact.digest);
            buffer.push('\n');
        }
        hash_content(buffer.as_bytes())
    }

    /// Total bytes written
    pub fn total_size(&self) -> u64 {
        self.artifacts.iter().map(|a| a.size).sum()
    }
}

/// Builds a distributable package from a source tree
pub struct PackageBuilder {
    /// Build settings
    config: BuildConfig,

    state: BuildState,

    /// Records per-file headers during transpilation; fresh every build
    transformer: Transformer,

    /// Source names in build order, set by the transpile step
    source_names: Vec<String>,

    /// Input manifest, read at most once per build
    manifest: Option<Manifest>,

    report: BuildReport,
}

impl PackageBuilder {
    /// Create a new builder
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            state: BuildState::Idle,
            transformer: Transformer::new(),
            source_names: Vec::new(),
            manifest: None,
            report: BuildReport::default(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut BuildConfig {
        &mut self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Run every build step in order
    ///
    /// Configuration is validated before anything touches the disk. On any
    /// failure the state becomes [`BuildState::Failed`] and the error is
    /// returned; no later step runs.
    pub async fn build(&mut self) -> Result<BuildReport> {
        if let Err(err) = self.config.validate() {
            error!("Build not started: {}", err);
            self.state = BuildState::Failed { at: None };
            return Err(err);
        }

        self.transformer = Transformer::new();
        self.source_names.clear();
        self.manifest = None;
        self.report = BuildReport::default();

        if self.config.package_name().is_empty() {
            info!("Building package ...");
        } else {
            info!("Building package \"{}\" ...", self.config.package_name());
        }
        info!("    source: {}", self.config.source_path().display());
        info!("    output: {}", self.config.output_path().display());

        for step in BuildStep::ALL {
            self.state = step.state();
            if let Err(err) = self.run_step(step).await {
                error!("Build failed during {} step: {}", step, err);
                self.state = BuildState::Failed { at: Some(step) };
                return Err(err);
            }
        }

        self.state = BuildState::Done;
        info!("Done.");

        Ok(std::mem::take(&mut self.report))
    }

    async fn run_step(&mut self, step: BuildStep) -> Result<()> {
        match step {
            BuildStep::Clean => self.clean().await,
            BuildStep::Prepare => self.prepare().await,
            BuildStep::Transpile => self.transpile().await,
            BuildStep::GenerateEntry => self.generate_entry().await,
            BuildStep::GenerateManifest => self.generate_manifest().await,
            BuildStep::CopyReadme => self.copy_optional(README_FILE_NAME).await,
            BuildStep::CopyLicense => self.copy_optional(LICENSE_FILE_NAME).await,
        }
    }

    /// Remove everything inside the output directory
    async fn clean(&mut self) -> Result<()> {
        let output = self.config.output_path();
        debug!("Cleaning {}", output.display());
        fs::clear_dir(&output).await
    }

    /// Create the output directory
    async fn prepare(&mut self) -> Result<()> {
        fs::create_dir_all(&self.config.output_path()).await
    }

    /// Wrap every source file into the output directory
    async fn transpile(&mut self) -> Result<()> {
        info!("Transpiling source files ...");

        let source_dir = self.config.source_path();
        let output_dir = self.config.output_path();

        let mut names = fs::list_names(&source_dir).await?;
        sort_names(&mut names);

        for name in &names {
            let output_name = script_file_name(name);
            info!("    {} -> {}", name, output_name);

            let source = fs::read_text(&source_dir.join(name)).await?;
            let result = self.transformer.transform(&source);

            self.write_artifact(&output_dir, &output_name, &result.wrapped_source).await?;
            self.report.transpiled.push(FileMapping {
                source: name.clone(),
                output: output_name,
            });
        }

        self.source_names = names;
        debug!("Transpiled {} file(s)", self.source_names.len());

        Ok(())
    }

    /// Write index.js exporting the version and every script
    async fn generate_entry(&mut self) -> Result<()> {
        info!("Creating {}", ENTRY_FILE_NAME);

        let header = self
            .transformer
            .uniform_header()
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        let version = self.manifest().await?.version().cloned();
        let source = entry::generate_entry(header.as_deref(), version.as_ref(), &self.source_names);

        let output_dir = self.config.output_path();
        self.write_artifact(&output_dir, ENTRY_FILE_NAME, &source).await?;
        self.report.entry_header = header;

        Ok(())
    }

    /// Write the derived package.json
    async fn generate_manifest(&mut self) -> Result<()> {
        info!("Creating {}", MANIFEST_FILE_NAME);

        let package_dir = self.config.package_path();
        let output_dir = self.config.output_path();
        let name_override = self.config.package_name().to_string();

        let input = self.manifest().await?;
        let dependencies = input
            .dependencies()
            .map(|deps| normalize_dependencies(deps, &package_dir, &output_dir));
        let fields = manifest::synthesize(input, &name_override, dependencies);
        let text = manifest::to_manifest_text(&fields)?;

        self.write_artifact(&output_dir, MANIFEST_FILE_NAME, &text).await
    }

    /// Copy a file from the package root when it exists
    async fn copy_optional(&mut self, file_name: &str) -> Result<()> {
        info!("Copying {}", file_name);

        let source = self.config.package_path().join(file_name);
        if !fs::exists(&source).await {
            debug!("No {} at {}, skipping", file_name, source.display());
            return Ok(());
        }

        let target = self.config.output_path().join(file_name);
        let size = fs::copy_recursive(&source, &target).await?;
        let digest = fs::digest(&target).await?;

        self.report.artifacts.push(Artifact {
            name: file_name.to_string(),
            path: target,
            size,
            digest,
        });

        Ok(())
    }

    /// Input manifest, loading it on first use
    async fn manifest(&mut self) -> Result<&Manifest> {
        let manifest = match self.manifest.take() {
            Some(manifest) => manifest,
            None => Manifest::load(&self.config.package_path()).await?,
        };
        Ok(self.manifest.insert(manifest))
    }

    async fn write_artifact(&mut self, dir: &Path, name: &str, content: &str) -> Result<()> {
        let path = dir.join(name);
        let size = fs::write_text(&path, content).await?;

        self.report.artifacts.push(Artifact {
            name: name.to_string(),
            path,
            size,
            digest: hash_content(content.as_bytes()),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str, content: &str) -> Artifact {
        Artifact {
            name: name.to_string(),
            path: PathBuf::from("/out").join(name),
            size: content.len() as u64,
            digest: hash_content(content.as_bytes()),
        }
    }

    #[test]
    fn test_fingerprint_tracks_names_and_content() {
        let report = |artifacts| BuildReport {
            artifacts,
            ..Default::default()
        };

        let a = report(vec![artifact("a.js", "x"), artifact("index.js", "y")]);
        let same = report(vec![artifact("a.js", "x"), artifact("index.js", "y")]);
        let renamed = report(vec![artifact("b.js", "x"), artifact("index.js", "y")]);
        let edited = report(vec![artifact("a.js", "z"), artifact("index.js", "y")]);

        assert_eq!(a.fingerprint(), same.fingerprint());
        assert_ne!(a.fingerprint(), renamed.fingerprint());
        assert_ne!(a.fingerprint(), edited.fingerprint());
        assert_eq!(a.total_size(), 2);
    }

    #[tokio::test]
    async fn test_configuration_error_fails_before_first_step() {
        let mut config = BuildConfig::new("/nonexistent/base");
        config.set_output_path(None::<&str>);
        let mut builder = PackageBuilder::new(config);

        assert_eq!(builder.state(), BuildState::Idle);
        let err = builder.build().await.unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(builder.state(), BuildState::Failed { at: None });
    }
}
