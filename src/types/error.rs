//! Unified Error Type System
//!
//! Centralized error types for the extraction pipeline.
//!
//! ## Error Classes
//!
//! - **Fatal**: the run cannot produce a consistent dataset (catalog load,
//!   schema mismatch, bad configuration)
//! - **Per-sample**: a single sample's artifacts are missing or unreadable;
//!   the sample degrades to zero-valued counters and the batch continues

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Schema Part
// =============================================================================

/// Which half of the feature schema a vector belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPart {
    Content,
    Structural,
}

impl std::fmt::Display for SchemaPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Structural => write!(f, "structural"),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum SwfvecError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Fatal Errors
    // -------------------------------------------------------------------------
    /// The API catalog could not be read; there is no feature schema without it
    #[error("Cannot load API catalog {}: {source}", path.display())]
    CatalogLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog lists the same name twice while duplicates are rejected
    #[error("Duplicate catalog entry '{name}' at line {line}")]
    DuplicateCatalogEntry { name: String, line: usize },

    /// A counter vector does not match its declared schema width
    #[error("Schema mismatch in {part} vector: expected {expected} columns, got {actual}")]
    SchemaMismatch {
        part: SchemaPart,
        expected: usize,
        actual: usize,
    },

    #[error("Config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Per-Sample Errors
    // -------------------------------------------------------------------------
    /// Script folder for a sample does not exist
    #[error("Script folder not found: {}", path.display())]
    FolderMissing { path: PathBuf },

    /// Structural dump could not be opened or read
    #[error("Cannot read dump {}: {source}", path.display())]
    DumpRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Input Format Errors
    // -------------------------------------------------------------------------
    #[error("Invalid sample index entry at line {line}: {message}")]
    SampleIndex { line: usize, message: String },

    #[error("Invalid label '{0}'")]
    InvalidLabel(String),

    #[error("Invalid feature record at line {line}: {message}")]
    Record { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, SwfvecError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl SwfvecError {
    /// Create a schema mismatch error
    pub fn schema_mismatch(part: SchemaPart, expected: usize, actual: usize) -> Self {
        Self::SchemaMismatch {
            part,
            expected,
            actual,
        }
    }

    /// Create a dump read error
    pub fn dump_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DumpRead {
            path: path.into(),
            source,
        }
    }

    /// Per-sample failures degrade to zero vectors; everything else aborts the run
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FolderMissing { .. } | Self::DumpRead { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================
