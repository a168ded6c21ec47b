//! Dataset Module
//!
//! Turns per-sample counters into the sparse feature file:
//! - Record assembly and sparse line encoding/decoding
//! - Sample index (paths file) handling
//! - Parallel batch pipeline with a single writer

pub mod assembler;
pub mod index;
pub mod pipeline;
pub mod writer;

pub use assembler::{FeatureRecord, SparseRecord, VectorAssembler};
pub use index::{IndexEntry, SampleIndex};
pub use pipeline::{BatchSummary, Pipeline, SampleOutcome};
pub use writer::{RecordWriter, read_records};
