//! Inspect Command
//!
//! Decode a feature file and summarize it.
//!
//! Usage:
//!   swfvec inspect features.libsvm [-f json] [--samples]

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::cli::Output;
use crate::dataset::{SparseRecord, read_records};
use crate::types::Result;

/// Totals over every record of a feature file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub records: usize,
    /// Record count per label value
    pub labels: BTreeMap<i32, usize>,
    /// Highest populated column across all records
    pub max_column: usize,
    /// Records with no non-zero column
    pub empty: usize,
    /// Mean number of non-zero columns per record
    pub mean_nonzero: f64,
}

impl FeatureSummary {
    pub fn from_records(records: &[SparseRecord]) -> Self {
        let mut summary = Self {
            records: records.len(),
            ..Default::default()
        };

        let mut nonzero = 0usize;
        for record in records {
            *summary.labels.entry(record.label.get()).or_insert(0) += 1;
            summary.max_column = summary.max_column.max(record.max_column());
            if record.columns.is_empty() {
                summary.empty += 1;
            }
            nonzero += record.columns.len();
        }

        if !records.is_empty() {
            summary.mean_nonzero = nonzero as f64 / records.len() as f64;
        }
        summary
    }
}

pub fn run(file: &Path, format: &str, samples: bool) -> Result<FeatureSummary> {
    let records = read_records(file)?;
    let summary = FeatureSummary::from_records(&records);

    if format == "json" {
        let json = if samples {
            serde_json::json!({ "summary": summary, "records": records })
        } else {
            serde_json::json!({ "summary": summary })
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(summary);
    }

    let output = Output::new();
    output.header(&format!("Feature file: {}", file.display()));
    output.field("Records", summary.records);
    output.field("Highest column", summary.max_column);
    output.field("Empty records", summary.empty);
    output.field("Mean non-zero", format!("{:.1}", summary.mean_nonzero));

    output.section("Labels");
    for (label, count) in &summary.labels {
        println!("  {:>4}  {}", label, count);
    }

    if samples {
        output.section("Samples");
        for record in &records {
            println!(
                "  {:<40} label={} non-zero={}",
                record.sample_id.as_deref().unwrap_or("-"),
                record.label,
                record.columns.len()
            );
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SwfvecError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_summary_counts_labels() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("features.libsvm");
        fs::write(&file, "0 1:2 17:1 # a\n1 # b\n0 3:1 # c\n\n").unwrap();

        let summary = run(&file, "json", false).unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.labels.get(&0), Some(&2));
        assert_eq!(summary.labels.get(&1), Some(&1));
        assert_eq!(summary.max_column, 17);
        assert_eq!(summary.empty, 1);
        assert!((summary.mean_nonzero - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_file() {
        let summary = FeatureSummary::from_records(&[]);
        assert_eq!(summary.records, 0);
        assert_eq!(summary.mean_nonzero, 0.0);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("features.libsvm");
        fs::write(&file, "0 1:1 # a\n1 5:1 2:1 # b\n").unwrap();

        let err = run(&file, "text", false).unwrap_err();
        assert!(matches!(err, SwfvecError::Record { line: 2, .. }));
    }
}
