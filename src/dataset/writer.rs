//! Feature file sink
//!
//! The only shared output of a batch. Records reach it from a single thread,
//! one full line per write, so lines never interleave.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::assembler::{FeatureRecord, SparseRecord};
use crate::types::Result;

pub struct RecordWriter<W: Write> {
    inner: W,
    written: usize,
}

impl RecordWriter<BufWriter<File>> {
    /// Open the feature file, appending or truncating
    pub fn create(path: &Path, append: bool) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        debug!(
            "Opened feature file {} ({})",
            path.display(),
            if append { "append" } else { "truncate" }
        );

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn write(&mut self, record: &FeatureRecord) -> Result<()> {
        writeln!(self.inner, "{}", record)?;
        self.written += 1;
        Ok(())
    }

    /// Records written through this writer
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Decode every non-blank line of a feature file
pub fn read_records(path: &Path) -> Result<Vec<SparseRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(SparseRecord::parse(&line, i + 1)?);
    }

    Ok(records)
}
