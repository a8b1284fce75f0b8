//! Build command implementation

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::builder::PackageBuilder;
use crate::config::{BuildConfig, CONFIG_FILE_NAME};
use crate::utils::{format_duration, format_size};

/// Build the package into its output directory
#[derive(Args, Debug, Default)]
pub struct BuildCommand {
    /// Package root, relative to the config file or working directory
    #[arg(short, long)]
    pub package: Option<String>,

    /// Source directory, relative to the package root
    #[arg(short, long)]
    pub source: Option<String>,

    /// Output directory, relative to the package root
    #[arg(short, long)]
    pub output: Option<String>,

    /// Name written to the output manifest instead of the package's own
    #[arg(short, long)]
    pub name: Option<String>,
}

impl BuildCommand {
    pub async fn execute(&self, config_path: Option<&Path>) -> Result<()> {
        let start = Instant::now();

        let config = self.resolve_config(config_path)?;

        eprintln!("{} Building package...", "→".blue());

        let mut builder = PackageBuilder::new(config);
        let report = builder.build().await.context("Build failed")?;

        let duration = start.elapsed();

        eprintln!(
            "\n{} Wrote {} file(s) ({}) in {}\n",
            "✓".green().bold(),
            report.artifacts.len(),
            format_size(report.total_size()),
            format_duration(duration)
        );

        for artifact in &report.artifacts {
            eprintln!(
                "  {} {} {}",
                "•".dimmed(),
                artifact.path.display().to_string().cyan(),
                format_size(artifact.size).dimmed()
            );
        }

        eprintln!("\n  fingerprint {}\n", report.fingerprint().dimmed());

        Ok(())
    }

    /// Config file settings (if any) with command-line overrides applied
    fn resolve_config(&self, config_path: Option<&Path>) -> Result<BuildConfig> {
        let default_path = PathBuf::from(CONFIG_FILE_NAME);
        let file = match config_path {
            Some(path) => Some(path),
            None if default_path.is_file() => Some(default_path.as_path()),
            None => None,
        };

        let mut config = match file {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                BuildConfig::load(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?
            }
            None => {
                let cwd = std::env::current_dir().context("Failed to read working directory")?;
                let mut config = BuildConfig::new(cwd);
                config.set_package_path(Some("."));
                config
            }
        };

        if let Some(package) = &self.package {
            config.set_package_path(Some(package.as_str()));
        }
        if let Some(source) = &self.source {
            config.set_source_path(Some(source.as_str()));
        }
        if let Some(output) = &self.output {
            config.set_output_path(Some(output.as_str()));
        }
        if let Some(name) = &self.name {
            config.set_package_name(Some(name.as_str()));
        }

        Ok(config)
    }
}
