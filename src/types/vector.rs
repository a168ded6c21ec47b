//! Per-sample counter vectors
//!
//! Both halves of a feature record are dense vectors of occurrence counts
//! against a fixed schema. A fresh vector is built for every sample and
//! handed back by value, so counts never leak between samples.

use serde::Serialize;

use super::error::{Result, SchemaPart, SwfvecError};

/// Dense occurrence counts indexed by schema position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterVector(Vec<u64>);

/// Counts against the API catalog (length = catalog size)
pub type ContentVector = CounterVector;

/// Counts against the tag taxonomy (length = 14)
pub type StructuralVector = CounterVector;

impl CounterVector {
    /// All-zero vector of the given schema width
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn from_counts(counts: Vec<u64>) -> Self {
        Self(counts)
    }

    /// Increment one position. Out-of-range indices are a schema bug.
    pub fn increment(&mut self, index: usize) {
        self.0[index] += 1;
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// `(index, count)` for every non-zero position, in index order
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, count)| **count != 0)
            .map(|(i, count)| (i, *count))
    }

    /// Fail with `SchemaMismatch` unless the vector has exactly `expected` entries
    pub fn ensure_len(&self, part: SchemaPart, expected: usize) -> Result<()> {
        if self.0.len() != expected {
            return Err(SwfvecError::schema_mismatch(part, expected, self.0.len()));
        }
        Ok(())
    }
}
