//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/swfvec/config.toml)
//! 3. Project config (./swfvec.toml or --config)
//! 4. Environment variables (SWFVEC_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::constants::files;
use crate::types::{Result, SwfvecError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project (or explicit file) → env vars
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let global = Self::global_config_path();
        let project = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::project_config_path);

        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(SwfvecError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        Self::load_layers(global.as_deref(), Some(&project))
    }

    /// Merge the given files over the defaults, then apply env vars
    pub fn load_layers(global: Option<&Path>, project: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = project
            && project_path.exists()
        {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(project_path));
        }

        // e.g. SWFVEC_EXTRACTION__WORKERS -> extraction.workers
        figment = figment.merge(Env::prefixed("SWFVEC_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| SwfvecError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/swfvec/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("swfvec"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(files::PROJECT_CONFIG)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(config: &Config, as_json: bool) -> Result<()> {
        if as_json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| SwfvecError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default project config into `dir`
    pub fn init_project(dir: &Path, force: bool) -> Result<PathBuf> {
        let config_path = dir.join(files::PROJECT_CONFIG);
        if config_path.exists() && !force {
            info!("Project config exists: {}", config_path.display());
            return Ok(config_path);
        }

        fs::create_dir_all(dir)?;
        fs::write(&config_path, Self::default_project_config())?;
        info!("Created project config: {}", config_path.display());

        Ok(config_path)
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# swfvec Project Configuration

version = "1.0"

[catalog]
path = "complete_api_list"
# "warn" keeps the first position of a repeated name, "error" refuses the catalog
duplicates = "warn"

# Decompiler export layout:
#   <outputs_dir>/<sample>/                  scripts
#   <outputs_dir>/<dumps_dir>/<sample>.dump  tag dump
[layout]
outputs_dir = "outputs"
dumps_dir = "dumps"
dump_extension = "dump"
skip_names = [".DS_Store"]

[extraction]
paths_file = "paths.txt"
output = "features.libsvm"
workers = 0
append = true
"#
        .to_string()
    }
}
