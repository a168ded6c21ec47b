//! Config Command
//!
//! Manage swfvec configuration.
//!
//! Usage:
//!   swfvec config show [-f json]
//!   swfvec config path
//!   swfvec config init [--force]

use std::path::PathBuf;

use crate::cli::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(config: &Config, format: &str) -> Result<()> {
    ConfigLoader::show_config(config, format == "json")
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default project config into the current directory
pub fn init(force: bool) -> Result<PathBuf> {
    let root = std::env::current_dir()?;
    let output = Output::new();

    let existing = root.join(ConfigLoader::project_config_path());
    if existing.exists() && !force {
        output.warning("Project config already exists (use --force to overwrite)");
        println!("  Config: {}", existing.display());
        return Ok(existing);
    }

    let config_path = ConfigLoader::init_project(&root, force)?;
    output.success("Initialized project configuration");
    println!("  Config: {}", config_path.display());

    Ok(config_path)
}
