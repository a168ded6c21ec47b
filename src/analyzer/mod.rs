//! Analyzer Module
//!
//! Feature extraction from decompiled artifacts:
//! - API catalog loading
//! - Script listing scan (catalog reference counts)
//! - Tag dump scan (structural category counts)

pub mod catalog;
pub mod content;
pub mod scanner;
pub mod structural;

pub use catalog::ApiCatalog;
pub use content::{ContentScan, ContentScanner};
pub use structural::{StructuralScan, StructuralScanner, TAXONOMY_LEN, TagCategory};
