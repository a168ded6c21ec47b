//! Sample Index
//!
//! Reads and generates the paths file that lists every sample of a batch:
//!
//! ```text
//! LABEL FULL_PATH FILE_NAME
//! ```
//!
//! Fields are separated by whitespace, so paths must not contain spaces.
//! The sample identifier is `FILE_NAME` without its `.swf` extension; it
//! names the script folder and dump file left by the decompiler.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::LayoutConfig;
use crate::constants::layout::SAMPLE_EXTENSION;
use crate::types::{Label, Result, Sample, SwfvecError};

/// One parsed line of the paths file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub label: Label,
    pub full_path: PathBuf,
    pub file_name: String,
}

impl IndexEntry {
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [label, full_path, file_name, ..] = fields.as_slice() else {
            return Err(SwfvecError::SampleIndex {
                line: line_no,
                message: format!("expected 'LABEL FULL_PATH FILE_NAME', got '{}'", line.trim()),
            });
        };

        let label = label.parse::<Label>().map_err(|e| SwfvecError::SampleIndex {
            line: line_no,
            message: e.to_string(),
        })?;

        Ok(Self {
            label,
            full_path: PathBuf::from(*full_path),
            file_name: file_name.to_string(),
        })
    }

    pub fn sample_id(&self) -> String {
        self.file_name.replace(SAMPLE_EXTENSION, "")
    }

    pub fn to_sample(&self, layout: &LayoutConfig) -> Sample {
        let id = self.sample_id();
        Sample::new(
            &id,
            self.label,
            layout.script_dir(&id),
            layout.dump_path(&id),
        )
    }
}

/// Samples of one batch, in paths-file order
#[derive(Debug, Clone, Default)]
pub struct SampleIndex {
    pub samples: Vec<Sample>,
    /// Entries whose original file no longer exists
    pub missing: usize,
}

impl SampleIndex {
    /// Load the paths file, resolving script/dump locations through `layout`
    ///
    /// Entries whose original file is gone are skipped with a warning.
    pub fn load(path: &Path, layout: &LayoutConfig) -> Result<Self> {
        let file = fs::File::open(path).map_err(|e| SwfvecError::SampleIndex {
            line: 0,
            message: format!("cannot open {}: {}", path.display(), e),
        })?;

        let mut index = Self::default();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = IndexEntry::parse(&line, i + 1)?;
            if !entry.full_path.exists() {
                warn!("File {} not found!", entry.full_path.display());
                index.missing += 1;
                continue;
            }

            debug!("Indexed sample {}", entry.sample_id());
            index.samples.push(entry.to_sample(layout));
        }

        info!(
            "Loaded {} samples from {} ({} missing)",
            index.samples.len(),
            path.display(),
            index.missing
        );

        Ok(index)
    }

    /// Append every file directly under `folder` to the paths file
    ///
    /// Sub-directories and names containing whitespace are skipped. Returns
    /// the number of lines written.
    pub fn append_folder(folder: &Path, label: Label, paths_file: &Path) -> Result<usize> {
        let folder = fs::canonicalize(folder)?;
        let mut names = Vec::new();

        for entry in fs::read_dir(&folder)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                info!("Found folder: {} Skipping...", entry.path().display());
                continue;
            }
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();

        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths_file)?;

        let mut written = 0;
        for name in names {
            let full_path = folder.join(&name);
            let full = full_path.to_string_lossy();
            if name.contains(char::is_whitespace) || full.contains(char::is_whitespace) {
                warn!("Skipping {}: paths file fields cannot contain spaces", full);
                continue;
            }
            writeln!(out, "{} {} {}", label, full, name)?;
            written += 1;
        }

        info!(
            "Appended {} {} samples from {} to {}",
            written,
            label.name(),
            folder.display(),
            paths_file.display()
        );

        Ok(written)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
