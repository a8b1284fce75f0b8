//! umdpack library
//!
//! Packages a module's source tree into a distributable library: every
//! source file is wrapped as a universal module, and an aggregate
//! `index.js`, a derived `package.json`, and the README and LICENSE are
//! written next to them.

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod transform;
pub mod utils;

pub use builder::{BuildReport, BuildState, BuildStep, PackageBuilder};
pub use cli::Cli;
pub use config::BuildConfig;
pub use error::{BuildError, Result};
