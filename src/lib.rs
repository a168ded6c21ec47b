//! swfvec - SWF Feature Vector Extraction
//!
//! Turns decompiled Shockwave Flash samples into fixed-width sparse feature
//! records for malware classifiers.
//!
//! ## Core Features
//!
//! - **Content features**: catalog API references counted in script listings
//! - **Structural features**: tag dump records counted into 14 categories
//! - **Sparse output**: one `label col:count ... # id` line per sample
//! - **Batch pipeline**: samples scanned in parallel, written in input order
//!
//! ## Quick Start
//!
//! ```ignore
//! use swfvec::{ApiCatalog, DuplicatePolicy, Pipeline, RecordWriter, SampleIndex};
//!
//! let config = swfvec::ConfigLoader::load(None)?;
//! let catalog = ApiCatalog::load(&config.catalog.path, DuplicatePolicy::Warn)?;
//! let index = SampleIndex::load(&config.extraction.paths_file, &config.layout)?;
//! let mut writer = RecordWriter::create(&config.extraction.output, true)?;
//! let summary = Pipeline::new(&catalog).run(&index.samples, &mut writer)?;
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: API catalog, content and structural scanners
//! - [`dataset`]: record assembly, paths file, batch pipeline, output sink
//! - [`config`]: layered configuration
//! - [`types`]: errors, labels, samples, counter vectors

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, DuplicatePolicy};

// Error Types
pub use types::error::{Result, SchemaPart, SwfvecError};

// Domain Types
pub use types::{ContentVector, CounterVector, Label, Sample, StructuralVector};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{
    ApiCatalog, ContentScanner, StructuralScanner, TAXONOMY_LEN, TagCategory,
    scanner::FileScanner,
};

// =============================================================================
// Dataset Re-exports
// =============================================================================

pub use dataset::{
    BatchSummary, FeatureRecord, Pipeline, RecordWriter, SampleIndex, SparseRecord,
    VectorAssembler,
};
