//! Command-line interface for umdpack
//!
//! Provides the main CLI structure using clap. The `build` subcommand
//! packages a module's source tree into its output directory.

mod build;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

pub use build::BuildCommand;

/// umdpack - package CommonJS sources as universal modules
#[derive(Parser, Debug)]
#[command(name = "umdpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to umdpack.toml config file (defaults to ./umdpack.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the package
    Build(BuildCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Build(cmd) => cmd.execute(self.config.as_deref()).await,
        }
    }
}

/// Print the umdpack banner
fn print_banner() {
    eprintln!(
        "\n{} {}\n",
        "umdpack".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
