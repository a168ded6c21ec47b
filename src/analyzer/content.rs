//! Content Scanner
//!
//! Counts catalog API references in a sample's decompiled script listings.
//!
//! Only lines carrying a name marker (`Qname`, `RTQname`, `Multiname`,
//! `pushstring`) are considered. Their double-quoted groups resolve to
//! candidate names:
//!
//! - one group: the string itself (`pushstring "loadBytes"`)
//! - two groups: `ns.name`, or just `name` when the namespace is empty or a
//!   single space (`Qname(PackageNamespace("flash.net"),"URLLoader")`)
//! - three or more: every group containing `:`, with `:` turned into `.`
//!
//! Every candidate present in the catalog adds one to its column. A single
//! line can hit several columns.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::catalog::ApiCatalog;
use super::scanner::FileScanner;
use crate::constants::script::{DEFAULT_SKIP_NAMES, NAME_MARKERS, QUALIFIER};
use crate::types::{ContentVector, Result};

#[allow(clippy::unwrap_used)] // Static regex pattern is hardcoded and valid
static RE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""(.*?)""#).unwrap());

/// Outcome of scanning one script folder
#[derive(Debug, Clone)]
pub struct ContentScan {
    pub counts: ContentVector,
    /// Files read to the end
    pub files_read: usize,
    /// Files that failed to open or read (partial counts kept)
    pub files_failed: usize,
    /// Entries the directory walk could not read
    pub walk_errors: usize,
}

/// Scans script folders against a shared, read-only catalog
pub struct ContentScanner<'a> {
    catalog: &'a ApiCatalog,
    skip_names: Vec<String>,
}

impl<'a> ContentScanner<'a> {
    pub fn new(catalog: &'a ApiCatalog) -> Self {
        Self {
            catalog,
            skip_names: DEFAULT_SKIP_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_skip_names(mut self, names: Vec<String>) -> Self {
        self.skip_names = names;
        self
    }

    /// Walk `root` recursively and count catalog hits into a fresh vector
    ///
    /// Fails only with `FolderMissing`. Unreadable files are logged and
    /// skipped; counts gathered before the failure are kept.
    pub fn scan(&self, root: &Path) -> Result<ContentScan> {
        let listing = FileScanner::new(root)
            .with_skip_names(&self.skip_names)
            .scan()?;

        let mut scan = ContentScan {
            counts: ContentVector::zeroed(self.catalog.len()),
            files_read: 0,
            files_failed: 0,
            walk_errors: listing.walk_errors,
        };

        for path in &listing.files {
            match self.scan_file(path, &mut scan.counts) {
                Ok(lines) => {
                    debug!("Scanned {} ({} lines)", path.display(), lines);
                    scan.files_read += 1;
                }
                Err(e) => {
                    warn!("Cannot read script {}: {}", path.display(), e);
                    scan.files_failed += 1;
                }
            }
        }

        Ok(scan)
    }

    fn scan_file(&self, path: &Path, counts: &mut ContentVector) -> io::Result<usize> {
        let file = File::open(path)?;
        self.scan_reader(BufReader::new(file), counts)
    }

    /// Count every line of `reader`; returns the number of lines read
    ///
    /// Bytes are decoded lossily so listings with stray non-UTF-8 data in
    /// string constants still count.
    pub fn scan_reader<R: BufRead>(
        &self,
        mut reader: R,
        counts: &mut ContentVector,
    ) -> io::Result<usize> {
        let mut buf = Vec::new();
        let mut lines = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            lines += 1;
            self.count_line(&String::from_utf8_lossy(&buf), counts);
        }

        Ok(lines)
    }

    /// Add one line's catalog hits to `counts`
    pub fn count_line(&self, line: &str, counts: &mut ContentVector) {
        for candidate in line_candidates(line) {
            if let Some(index) = self.catalog.index_of(&candidate) {
                counts.increment(index);
            }
        }
    }
}

/// Candidate API names referenced by one listing line
pub fn line_candidates(line: &str) -> Vec<String> {
    if !NAME_MARKERS.iter().any(|marker| line.contains(marker)) {
        return Vec::new();
    }

    let groups: Vec<&str> = RE_QUOTED
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    resolve_groups(&groups)
}

/// Turn the quoted groups of a line into candidate names
pub fn resolve_groups(groups: &[&str]) -> Vec<String> {
    match groups {
        [] => Vec::new(),
        [single] => vec![single.to_string()],
        [namespace, name] => {
            if namespace.is_empty() || *namespace == " " {
                vec![name.to_string()]
            } else {
                vec![format!("{}{}{}", namespace, QUALIFIER, name)]
            }
        }
        _ => groups
            .iter()
            .filter(|group| group.contains(':'))
            .map(|group| group.replace(':', QUALIFIER))
            .collect(),
    }
}
