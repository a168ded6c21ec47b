//! Vector Assembly
//!
//! Joins a sample's content counts (columns `1..=N`) and structural counts
//! (columns `N+1..=N+14`) into one fixed-width record and encodes it in the
//! sparse text format:
//!
//! ```text
//! <label> <col>:<count> <col>:<count> ... # <sample_id>
//! ```
//!
//! Columns are 1-based and zero counts are omitted. The identifier after
//! `#` is a comment kept for traceability only.

use std::fmt;

use serde::Serialize;

use crate::analyzer::structural::TAXONOMY_LEN;
use crate::constants::record::COMMENT_MARKER;
use crate::types::{ContentVector, Label, Result, SchemaPart, StructuralVector, SwfvecError};

/// Builds records against one fixed schema width
#[derive(Debug, Clone, Copy)]
pub struct VectorAssembler {
    content_len: usize,
}

impl VectorAssembler {
    /// `content_len` is the catalog size `N`
    pub fn new(content_len: usize) -> Self {
        Self { content_len }
    }

    /// Total record width (`N + 14`)
    pub fn width(&self) -> usize {
        self.content_len + TAXONOMY_LEN
    }

    /// Concatenate both halves, content first
    ///
    /// Fails with `SchemaMismatch` if either vector has the wrong length.
    pub fn assemble(
        &self,
        label: Label,
        content: &ContentVector,
        structural: &StructuralVector,
        sample_id: &str,
    ) -> Result<FeatureRecord> {
        content.ensure_len(SchemaPart::Content, self.content_len)?;
        structural.ensure_len(SchemaPart::Structural, TAXONOMY_LEN)?;

        let mut values = Vec::with_capacity(self.width());
        values.extend_from_slice(content.as_slice());
        values.extend_from_slice(structural.as_slice());

        Ok(FeatureRecord {
            label,
            values,
            content_len: self.content_len,
            sample_id: sample_id.to_string(),
        })
    }
}

/// One sample's full feature row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRecord {
    pub label: Label,
    values: Vec<u64>,
    content_len: usize,
    pub sample_id: String,
}

impl FeatureRecord {
    /// Dense values, content then structural
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn content(&self) -> &[u64] {
        &self.values[..self.content_len]
    }

    pub fn structural(&self) -> &[u64] {
        &self.values[self.content_len..]
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    /// `(1-based column, count)` for every non-zero value
    pub fn columns(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(i, v)| (i + 1, *v))
    }

    pub fn to_sparse(&self) -> SparseRecord {
        SparseRecord {
            label: self.label,
            columns: self.columns().collect(),
            sample_id: Some(self.sample_id.clone()),
        }
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        for (col, count) in self.columns() {
            write!(f, " {}:{}", col, count)?;
        }
        write!(f, " {} {}", COMMENT_MARKER, self.sample_id)
    }
}

// =============================================================================
// Sparse Line Decoding
// =============================================================================

/// A decoded line of the feature file
///
/// Decoding cannot recover the schema width, so only the non-zero columns
/// are available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SparseRecord {
    pub label: Label,
    pub columns: Vec<(usize, u64)>,
    pub sample_id: Option<String>,
}

impl SparseRecord {
    /// Parse one line; `line_no` is only used for error messages
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let err = |message: String| SwfvecError::Record {
            line: line_no,
            message,
        };

        let (body, comment) = match line.split_once(COMMENT_MARKER) {
            Some((body, comment)) => (body, Some(comment.trim().to_string())),
            None => (line, None),
        };

        let mut fields = body.split_whitespace();
        let label = fields
            .next()
            .ok_or_else(|| err("missing label".to_string()))?
            .parse::<Label>()
            .map_err(|e| err(e.to_string()))?;

        let mut columns = Vec::new();
        let mut last_col = 0;
        for field in fields {
            let (col, count) = field
                .split_once(':')
                .ok_or_else(|| err(format!("expected <col>:<count>, got '{}'", field)))?;
            let col: usize = col
                .parse()
                .map_err(|_| err(format!("invalid column '{}'", col)))?;
            let count: u64 = count
                .parse()
                .map_err(|_| err(format!("invalid count '{}'", count)))?;

            if col <= last_col {
                return Err(err(format!(
                    "columns must be 1-based and increasing, got {} after {}",
                    col, last_col
                )));
            }
            last_col = col;
            columns.push((col, count));
        }

        Ok(Self {
            label,
            columns,
            sample_id: comment.filter(|c| !c.is_empty()),
        })
    }

    /// Highest populated column, 0 when empty
    pub fn max_column(&self) -> usize {
        self.columns.last().map(|(col, _)| *col).unwrap_or(0)
    }
}

impl fmt::Display for SparseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        for (col, count) in &self.columns {
            write!(f, " {}:{}", col, count)?;
        }
        if let Some(id) = &self.sample_id {
            write!(f, " {} {}", COMMENT_MARKER, id)?;
        }
        Ok(())
    }
}
