//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Defaults reproduce the decompiler export layout, so a bare run in a
//! working directory containing `paths.txt`, `complete_api_list` and
//! `outputs/` needs no configuration at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{files, layout, script};
use crate::types::{Result, SwfvecError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// API catalog settings
    pub catalog: CatalogConfig,

    /// Decompiler output layout
    pub layout: LayoutConfig,

    /// Batch extraction settings
    pub extraction: ExtractionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            catalog: CatalogConfig::default(),
            layout: LayoutConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    /// Returns `SwfvecError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.path.as_os_str().is_empty() {
            return Err(SwfvecError::Config(
                "catalog.path must not be empty".to_string(),
            ));
        }

        if self.layout.dump_extension.is_empty() || self.layout.dump_extension.starts_with('.') {
            return Err(SwfvecError::Config(format!(
                "layout.dump_extension must be a bare extension, got '{}'",
                self.layout.dump_extension
            )));
        }

        if self.extraction.output.as_os_str().is_empty() {
            return Err(SwfvecError::Config(
                "extraction.output must not be empty".to_string(),
            ));
        }

        for pattern in &self.layout.skip_names {
            glob::Pattern::new(pattern).map_err(|e| {
                SwfvecError::Config(format!("Invalid skip pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Catalog Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Newline-delimited list of fully qualified API names
    pub path: PathBuf,

    /// How repeated names in the catalog are handled
    pub duplicates: DuplicatePolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(files::DEFAULT_CATALOG),
            duplicates: DuplicatePolicy::Warn,
        }
    }
}

/// Policy for catalog names listed more than once
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the first position, log the repeat
    #[default]
    Warn,
    /// Refuse to load the catalog
    Error,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::Warn => write!(f, "warn"),
            DuplicatePolicy::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warn" => Ok(DuplicatePolicy::Warn),
            "error" => Ok(DuplicatePolicy::Error),
            _ => Err(format!(
                "Unknown duplicate policy: {}. Valid values: warn, error",
                s
            )),
        }
    }
}

// =============================================================================
// Layout Configuration
// =============================================================================

/// Where the decompiler left each sample's scripts and dump
///
/// For a sample `abc`: scripts live in `<outputs_dir>/abc/` and the dump in
/// `<outputs_dir>/<dumps_dir>/abc.<dump_extension>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub outputs_dir: PathBuf,
    pub dumps_dir: PathBuf,
    pub dump_extension: String,

    /// File name globs skipped while walking script folders
    pub skip_names: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            outputs_dir: PathBuf::from(layout::DEFAULT_OUTPUTS_DIR),
            dumps_dir: PathBuf::from(layout::DEFAULT_DUMPS_DIR),
            dump_extension: layout::DEFAULT_DUMP_EXTENSION.to_string(),
            skip_names: script::DEFAULT_SKIP_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl LayoutConfig {
    pub fn script_dir(&self, sample_id: &str) -> PathBuf {
        self.outputs_dir.join(sample_id)
    }

    pub fn dump_path(&self, sample_id: &str) -> PathBuf {
        self.outputs_dir
            .join(&self.dumps_dir)
            .join(format!("{}.{}", sample_id, self.dump_extension))
    }

    /// Rebase relative directories onto `root`
    pub fn rooted_at(mut self, root: &Path) -> Self {
        if self.outputs_dir.is_relative() {
            self.outputs_dir = root.join(&self.outputs_dir);
        }
        self
    }
}

// =============================================================================
// Extraction Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sample index file (`LABEL FULL_PATH FILE_NAME` per line)
    pub paths_file: PathBuf,

    /// Sparse feature file
    pub output: PathBuf,

    /// Worker threads (0 = one per core)
    pub workers: usize,

    /// Append to an existing output instead of truncating it
    pub append: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            paths_file: PathBuf::from(files::DEFAULT_PATHS_FILE),
            output: PathBuf::from(files::DEFAULT_OUTPUT),
            workers: 0,
            append: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.catalog.path, PathBuf::from("complete_api_list"));
        assert_eq!(config.extraction.output, PathBuf::from("features.libsvm"));
        assert!(config.extraction.append);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_layout_paths() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.script_dir("abc"), PathBuf::from("outputs/abc"));
        assert_eq!(
            layout.dump_path("abc"),
            PathBuf::from("outputs/dumps/abc.dump")
        );

        let rooted = layout.rooted_at(Path::new("/data"));
        assert_eq!(rooted.script_dir("abc"), PathBuf::from("/data/outputs/abc"));
    }

    #[test]
    fn test_duplicate_policy() {
        assert_eq!("warn".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Warn);
        assert_eq!(
            "ERROR".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::Error
        );
        assert!("ignore".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let mut config = Config::default();
        config.layout.dump_extension = ".dump".to_string();
        assert!(matches!(config.validate(), Err(SwfvecError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut config = Config::default();
        config.layout.skip_names.push("[".to_string());
        assert!(config.validate().is_err());
    }
}
