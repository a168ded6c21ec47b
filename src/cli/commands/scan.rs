//! Scan Commands
//!
//! Run one scanner against a single input and print its counts.
//!
//! Usage:
//!   swfvec scan-dump outputs/dumps/clip.dump [-f json]
//!   swfvec scan-scripts outputs/clip [--catalog complete_api_list] [-f json]

use std::path::Path;

use serde::Serialize;

use crate::analyzer::{ApiCatalog, ContentScanner, StructuralScanner, TagCategory};
use crate::cli::Output;
use crate::config::Config;
use crate::types::Result;

/// One named counter in a scan report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub column: usize,
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DumpReport {
    pub records: usize,
    pub categories: Vec<CountRow>,
    /// Largest `len=` seen per category, in taxonomy order
    pub max_lengths: Vec<Option<u64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub catalog_size: usize,
    pub files_read: usize,
    pub files_failed: usize,
    /// Non-zero catalog entries only
    pub hits: Vec<CountRow>,
}

/// Structural counts of one dump file, all 14 categories
pub fn dump_report(file: &Path) -> Result<DumpReport> {
    let scan = StructuralScanner::new().scan_detailed(file)?;

    let categories = TagCategory::ALL
        .iter()
        .map(|category| CountRow {
            column: category.index() + 1,
            name: category.name().to_string(),
            count: scan.counts.get(category.index()).unwrap_or(0),
        })
        .collect();

    let max_lengths = scan
        .lengths
        .iter()
        .map(|lengths| lengths.iter().copied().max())
        .collect();

    Ok(DumpReport {
        records: scan.records,
        categories,
        max_lengths,
    })
}

/// Catalog hits in one script folder
pub fn script_report(dir: &Path, config: &Config) -> Result<ScriptReport> {
    let catalog = ApiCatalog::load(&config.catalog.path, config.catalog.duplicates)?;
    let scan = ContentScanner::new(&catalog)
        .with_skip_names(config.layout.skip_names.clone())
        .scan(dir)?;

    let hits = scan
        .counts
        .nonzero()
        .map(|(index, count)| CountRow {
            column: index + 1,
            name: catalog.name(index).unwrap_or_default().to_string(),
            count,
        })
        .collect();

    Ok(ScriptReport {
        catalog_size: catalog.len(),
        files_read: scan.files_read,
        files_failed: scan.files_failed,
        hits,
    })
}

pub fn dump(file: &Path, format: &str) -> Result<()> {
    let report = dump_report(file)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let output = Output::new();
    output.header(&format!("Tag dump: {}", file.display()));
    output.field("Records", report.records);
    output.section("Categories");
    for (row, max_len) in report.categories.iter().zip(&report.max_lengths) {
        match max_len {
            Some(len) => println!(
                "  {:>2}  {:<14} {:>8}   max len={}",
                row.column, row.name, row.count, len
            ),
            None => println!("  {:>2}  {:<14} {:>8}", row.column, row.name, row.count),
        }
    }
    Ok(())
}

pub fn scripts(dir: &Path, config: &Config, format: &str) -> Result<()> {
    let report = script_report(dir, config)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let output = Output::new();
    output.header(&format!("Scripts: {}", dir.display()));
    output.field("Catalog size", report.catalog_size);
    output.field("Files read", report.files_read);
    if report.files_failed > 0 {
        output.warning(&format!("{} files could not be read", report.files_failed));
    }

    if report.hits.is_empty() {
        println!("\nNo catalog APIs referenced.");
        return Ok(());
    }

    output.section(&format!("API hits ({})", report.hits.len()));
    for row in &report.hits {
        println!("  {:>6}  {:<48} {}", row.column, row.name, row.count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SwfvecError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dump_report_lists_every_category() {
        let temp = TempDir::new().unwrap();
        let dump = temp.path().join("clip.dump");
        fs::write(
            &dump,
            "DefineBitsJPEG2 (21) len=4000\nDefineBits (6) len=12\nFileAttributes (69) len=4\n",
        )
        .unwrap();

        let report = dump_report(&dump).unwrap();
        assert_eq!(report.records, 3);
        assert_eq!(report.categories.len(), 14);

        let images = &report.categories[TagCategory::Images.index()];
        assert_eq!(images.name, "images");
        assert_eq!(images.count, 2);
        assert_eq!(report.max_lengths[TagCategory::Images.index()], Some(4000));

        let unknown = &report.categories[TagCategory::Unknown.index()];
        assert_eq!(unknown.count, 0);
        assert_eq!(report.max_lengths[TagCategory::Unknown.index()], None);
    }

    #[test]
    fn test_dump_report_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = dump_report(&temp.path().join("absent.dump")).unwrap_err();
        assert!(matches!(err, SwfvecError::DumpRead { .. }));
    }

    #[test]
    fn test_script_report_only_nonzero() {
        let temp = TempDir::new().unwrap();
        let list = temp.path().join("list");
        fs::write(&list, "flash.utils.ByteArray\nloadBytes\nescape\n").unwrap();

        let scripts = temp.path().join("clip");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(
            scripts.join("Main.pcode"),
            "pushstring \"loadBytes\"\npushstring \"loadBytes\"\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.catalog.path = list;

        let report = script_report(&scripts, &config).unwrap();
        assert_eq!(report.catalog_size, 3);
        assert_eq!(report.files_read, 1);
        assert_eq!(
            report.hits,
            vec![CountRow {
                column: 2,
                name: "loadBytes".to_string(),
                count: 2,
            }]
        );
    }
}
