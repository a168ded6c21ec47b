use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::script::DEFAULT_SKIP_NAMES;
use crate::types::{Result, SwfvecError};

/// Walks one sample's script folder and lists the files to read
///
/// Decompiler output is taken as-is: no ignore files, hidden files included,
/// symlinks not followed. Only entries whose file name matches a skip
/// pattern are left out.
pub struct FileScanner {
    root: PathBuf,
    skip: Vec<glob::Pattern>,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let skip = DEFAULT_SKIP_NAMES
            .iter()
            .filter_map(|name| glob::Pattern::new(name).ok())
            .collect();
        Self {
            root: root.as_ref().to_path_buf(),
            skip,
        }
    }

    /// Replace the skip patterns (matched against the file name only)
    pub fn with_skip_names(mut self, patterns: &[String]) -> Self {
        self.skip = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid skip pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();
        self
    }

    /// List files under the root, sorted by path within each directory
    ///
    /// A missing root is `FolderMissing`. Entries the walker cannot read are
    /// logged and counted in `ScanListing::walk_errors`; the walk continues.
    pub fn scan(&self) -> Result<ScanListing> {
        if !self.root.is_dir() {
            return Err(SwfvecError::FolderMissing {
                path: self.root.clone(),
            });
        }

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut listing = ScanListing::default();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %self.root.display(), "Skipping unreadable entry: {}", e);
                    listing.walk_errors += 1;
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            if self.should_skip(path) {
                debug!("Skipping {}", path.display());
                listing.skipped += 1;
                continue;
            }

            listing.files.push(path.to_path_buf());
        }

        Ok(listing)
    }

    fn should_skip(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.skip.iter().any(|pattern| pattern.matches(name))
    }
}

/// Result of walking one script folder
#[derive(Debug, Clone, Default)]
pub struct ScanListing {
    pub files: Vec<PathBuf>,
    /// Files left out by skip patterns
    pub skipped: usize,
    /// Entries the walker could not read
    pub walk_errors: usize,
}
