//! API Catalog
//!
//! Ordered, deduplicated list of fully qualified API names. Position in the
//! catalog file is the column index in the content half of every record, so
//! indices are assigned once at load time and never change afterwards.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::config::DuplicatePolicy;
use crate::types::{Result, SwfvecError};

/// Immutable name → index lookup shared read-only across scans
#[derive(Debug, Clone, Default)]
pub struct ApiCatalog {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ApiCatalog {
    /// Load a catalog file, one name per line
    pub fn load(path: &Path, duplicates: DuplicatePolicy) -> Result<Self> {
        let file = File::open(path).map_err(|source| SwfvecError::CatalogLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let reader = BufReader::new(file);
        let mut catalog = Self::default();
        let mut repeated = 0usize;
        let mut blank = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| SwfvecError::CatalogLoad {
                path: path.to_path_buf(),
                source,
            })?;
            let name = line.trim_end_matches('\r');
            if name.is_empty() {
                warn!(
                    line = line_no + 1,
                    "Blank catalog line skipped; later columns shift up by one"
                );
                blank += 1;
                continue;
            }

            if !catalog.insert(name) {
                match duplicates {
                    DuplicatePolicy::Error => {
                        return Err(SwfvecError::DuplicateCatalogEntry {
                            name: name.to_string(),
                            line: line_no + 1,
                        });
                    }
                    DuplicatePolicy::Warn => {
                        warn!(
                            entry = name,
                            line = line_no + 1,
                            "Duplicate catalog entry ignored"
                        );
                        repeated += 1;
                    }
                }
            }
        }

        debug!(
            "Loaded {} catalog entries from {} ({} duplicates, {} blank lines)",
            catalog.len(),
            path.display(),
            repeated,
            blank
        );

        Ok(catalog)
    }

    /// Build a catalog from names in order, keeping the first position of repeats
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();
        for name in names {
            catalog.insert(name.as_ref());
        }
        catalog
    }

    /// Returns false when the name is already present
    fn insert(&mut self, name: &str) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.names.len());
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_catalog(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("complete_api_list");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_assigns_positions() {
        let temp = TempDir::new().unwrap();
        let path = write_catalog(
            &temp,
            "flash.display.Loader\nflash.net.URLRequest\nflash.utils.ByteArray\n",
        );

        let catalog = ApiCatalog::load(&path, DuplicatePolicy::Warn).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.index_of("flash.display.Loader"), Some(0));
        assert_eq!(catalog.index_of("flash.utils.ByteArray"), Some(2));
        assert!(catalog.contains("flash.net.URLRequest"));
        assert!(!catalog.contains("flash.net.URLLoader"));
        assert_eq!(catalog.name(1), Some("flash.net.URLRequest"));
    }

    #[test]
    fn test_load_strips_crlf() {
        let temp = TempDir::new().unwrap();
        let path = write_catalog(&temp, "loadBytes\r\nwriteBytes\r\n");

        let catalog = ApiCatalog::load(&path, DuplicatePolicy::Warn).unwrap();
        assert!(catalog.contains("loadBytes"));
        assert!(catalog.contains("writeBytes"));
    }

    #[test]
    fn test_last_line_without_newline() {
        let temp = TempDir::new().unwrap();
        let path = write_catalog(&temp, "a.b\nc.d");

        let catalog = ApiCatalog::load(&path, DuplicatePolicy::Warn).unwrap();
        assert_eq!(catalog.names(), &["a.b".to_string(), "c.d".to_string()]);
    }

    #[test]
    fn test_blank_lines_are_not_names() {
        let temp = TempDir::new().unwrap();
        let path = write_catalog(&temp, "a.b\n\nc.d\n\n");

        let catalog = ApiCatalog::load(&path, DuplicatePolicy::Error).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.contains(""));
        assert_eq!(catalog.index_of("c.d"), Some(1));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let temp = TempDir::new().unwrap();
        let path = write_catalog(&temp, "a.b\nc.d\na.b\ne.f\n");

        let catalog = ApiCatalog::load(&path, DuplicatePolicy::Warn).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.index_of("a.b"), Some(0));
        assert_eq!(catalog.index_of("e.f"), Some(2));
    }

    #[test]
    fn test_duplicates_rejected_in_strict_mode() {
        let temp = TempDir::new().unwrap();
        let path = write_catalog(&temp, "a.b\nc.d\na.b\n");

        let err = ApiCatalog::load(&path, DuplicatePolicy::Error).unwrap_err();
        assert!(matches!(
            err,
            SwfvecError::DuplicateCatalogEntry { ref name, line: 3 } if name == "a.b"
        ));
    }

    #[test]
    fn test_missing_catalog_is_load_error() {
        let err = ApiCatalog::load(Path::new("/nonexistent/list"), DuplicatePolicy::Warn)
            .unwrap_err();
        assert!(matches!(err, SwfvecError::CatalogLoad { .. }));
        assert!(!err.is_recoverable());
    }
}
