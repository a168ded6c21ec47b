//! Batch Extraction Pipeline
//!
//! For every sample: content scan, structural scan, assembly. Samples are
//! independent, so scans run on a rayon pool against the shared read-only
//! catalog. Records are collected back in input order and written by the
//! calling thread only.
//!
//! A sample whose scripts or dump are missing or unreadable still produces a
//! record: the affected half is zero-filled and a warning names the sample,
//! so every input sample yields exactly one fixed-width line.

use std::io::{ErrorKind, Write};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::assembler::{FeatureRecord, VectorAssembler};
use super::writer::RecordWriter;
use crate::analyzer::structural::TAXONOMY_LEN;
use crate::analyzer::{ApiCatalog, ContentScanner, StructuralScanner};
use crate::constants::pipeline::{CHUNK_SIZE, PROGRESS_INTERVAL};
use crate::constants::script::DEFAULT_SKIP_NAMES;
use crate::types::{ContentVector, Result, Sample, StructuralVector, SwfvecError};

/// Per-sample result before it is written
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    pub record: FeatureRecord,
    pub content_degraded: bool,
    pub structural_degraded: bool,
}

/// Totals for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub samples: usize,
    pub written: usize,
    /// Samples whose content half was zero-filled
    pub degraded_content: usize,
    /// Samples whose structural half was zero-filled
    pub degraded_structural: usize,
}

pub struct Pipeline<'a> {
    catalog: &'a ApiCatalog,
    assembler: VectorAssembler,
    skip_names: Vec<String>,
    workers: usize,
}

impl<'a> Pipeline<'a> {
    pub fn new(catalog: &'a ApiCatalog) -> Self {
        Self {
            catalog,
            assembler: VectorAssembler::new(catalog.len()),
            skip_names: DEFAULT_SKIP_NAMES.iter().map(|s| s.to_string()).collect(),
            workers: 0,
        }
    }

    pub fn with_skip_names(mut self, names: Vec<String>) -> Self {
        self.skip_names = names;
        self
    }

    /// Worker threads; 0 uses one per core
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Scan and assemble one sample
    ///
    /// Only fatal errors (schema mismatch) are returned; per-sample I/O
    /// failures degrade the affected half to zeros.
    pub fn process(&self, sample: &Sample) -> Result<SampleOutcome> {
        debug!(sample = %sample.id, "Analyzing sample");

        let (content, content_degraded) = self.content_counts(sample)?;
        let (structural, structural_degraded) = self.structural_counts(sample)?;

        let record = self
            .assembler
            .assemble(sample.label, &content, &structural, &sample.id)?;

        Ok(SampleOutcome {
            record,
            content_degraded,
            structural_degraded,
        })
    }

    fn content_counts(&self, sample: &Sample) -> Result<(ContentVector, bool)> {
        let scanner = ContentScanner::new(self.catalog).with_skip_names(self.skip_names.clone());

        match scanner.scan(&sample.script_dir) {
            Ok(scan) => {
                if scan.files_failed > 0 || scan.walk_errors > 0 {
                    warn!(
                        sample = %sample.id,
                        files_failed = scan.files_failed,
                        walk_errors = scan.walk_errors,
                        "Partial script scan; counts cover readable files only"
                    );
                }
                Ok((scan.counts, false))
            }
            Err(e @ SwfvecError::FolderMissing { .. }) => {
                warn!(sample = %sample.id, "No scripts for sample: {}", e);
                Ok((ContentVector::zeroed(self.catalog.len()), true))
            }
            Err(e) => Err(e),
        }
    }

    fn structural_counts(&self, sample: &Sample) -> Result<(StructuralVector, bool)> {
        match StructuralScanner::new().scan(&sample.dump_path) {
            Ok(counts) => Ok((counts, false)),
            Err(SwfvecError::DumpRead { path, source }) => {
                if source.kind() == ErrorKind::NotFound {
                    warn!(sample = %sample.id, "Dump not found: {}", path.display());
                } else {
                    error!(
                        sample = %sample.id,
                        "Error reading dump {}: {}",
                        path.display(),
                        source
                    );
                }
                Ok((StructuralVector::zeroed(TAXONOMY_LEN), true))
            }
            Err(e) => Err(e),
        }
    }

    /// Process every sample and write one record each, in input order
    pub fn run<W: Write>(
        &self,
        samples: &[Sample],
        writer: &mut RecordWriter<W>,
    ) -> Result<BatchSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| SwfvecError::Config(format!("Cannot start worker pool: {}", e)))?;

        info!(
            "Starting feature extraction: {} samples, {} columns, {} workers",
            samples.len(),
            self.assembler.width(),
            pool.current_num_threads()
        );

        let mut summary = BatchSummary {
            samples: samples.len(),
            ..Default::default()
        };

        for chunk in samples.chunks(CHUNK_SIZE) {
            let outcomes: Vec<SampleOutcome> = pool.install(|| {
                chunk
                    .par_iter()
                    .map(|sample| self.process(sample))
                    .collect::<Result<Vec<_>>>()
            })?;

            for outcome in outcomes {
                writer.write(&outcome.record)?;
                summary.written += 1;
                summary.degraded_content += usize::from(outcome.content_degraded);
                summary.degraded_structural += usize::from(outcome.structural_degraded);

                if summary.written % PROGRESS_INTERVAL == 0 {
                    info!("Number of files analyzed: {}", summary.written);
                }
            }
            writer.flush()?;
        }

        info!(
            written = summary.written,
            degraded_content = summary.degraded_content,
            degraded_structural = summary.degraded_structural,
            "Feature extraction complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::TagCategory;
    use crate::config::{DuplicatePolicy, LayoutConfig};
    use crate::dataset::{SampleIndex, SparseRecord};
    use crate::types::Label;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const CATALOG: &str = "flash.display.Loader\nflash.utils.ByteArray\nloadBytes\n";

    /// Decompiler-style tree: outputs/<id>/..., outputs/dumps/<id>.dump
    fn write_sample(outputs: &Path, id: &str, script: Option<&str>, dump: Option<&str>) {
        if let Some(script) = script {
            let dir = outputs.join(id).join("scripts");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("Main.pcode"), script).unwrap();
        }
        if let Some(dump) = dump {
            let dumps = outputs.join("dumps");
            fs::create_dir_all(&dumps).unwrap();
            fs::write(dumps.join(format!("{}.dump", id)), dump).unwrap();
        }
    }

    fn fixture() -> (TempDir, ApiCatalog, Vec<Sample>) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("complete_api_list"), CATALOG).unwrap();

        let originals = root.join("Malicious");
        fs::create_dir_all(&originals).unwrap();
        for id in ["alpha", "beta", "gamma"] {
            fs::write(originals.join(format!("{}.swf", id)), b"CWS").unwrap();
        }

        let outputs = root.join("outputs");
        write_sample(
            &outputs,
            "alpha",
            Some(
                "getlex Qname(PackageNamespace(\"flash.display\"),\"Loader\")\n\
                 callpropvoid Qname(PackageNamespace(\"\"),\"loadBytes\") 1\n\
                 pushstring \"loadBytes\"\n",
            ),
            Some("DoABC (82) len=300\nDefineButton2 (34) len=20\nShowFrame (1) len=0\n"),
        );
        // scripts only, dump missing
        write_sample(
            &outputs,
            "beta",
            Some("pushstring \"flash.utils.ByteArray\"\n"),
            None,
        );
        // dump only, scripts missing
        write_sample(&outputs, "gamma", None, Some("DefineSprite (39) len=50\n"));

        let paths = root.join("paths.txt");
        SampleIndex::append_folder(&originals, Label::MALICIOUS, &paths).unwrap();

        let layout = LayoutConfig::default().rooted_at(root);
        let index = SampleIndex::load(&paths, &layout).unwrap();
        let catalog =
            ApiCatalog::load(&root.join("complete_api_list"), DuplicatePolicy::Warn).unwrap();

        (temp, catalog, index.samples)
    }

    #[test]
    fn test_batch_writes_one_line_per_sample() {
        let (_temp, catalog, samples) = fixture();
        let mut writer = RecordWriter::new(Vec::new());

        let summary = Pipeline::new(&catalog)
            .with_workers(2)
            .run(&samples, &mut writer)
            .unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                samples: 3,
                written: 3,
                degraded_content: 1,
                degraded_structural: 1,
            }
        );

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);

        // N = 3: scripts at col 3+4+1 = 8, frames at 4, buttons at 3+10+1 = 14
        assert_eq!(lines[0], "0 1:1 3:2 4:1 8:2 14:1 # alpha");
        assert_eq!(lines[1], "0 2:1 # beta");
        assert_eq!(
            lines[2],
            format!("0 {}:1 # gamma", 3 + TagCategory::Sprites.index() + 1)
        );

        for line in lines {
            let record = SparseRecord::parse(line, 1).unwrap();
            assert!(record.max_column() <= catalog.len() + TAXONOMY_LEN);
        }
    }

    #[test]
    fn test_process_sample_is_repeatable() {
        let (_temp, catalog, samples) = fixture();
        let pipeline = Pipeline::new(&catalog);

        let first = pipeline.process(&samples[0]).unwrap();
        let second = pipeline.process(&samples[0]).unwrap();
        assert_eq!(first.record, second.record);
        assert!(!first.content_degraded);
        assert!(!first.structural_degraded);
    }

    #[test]
    fn test_degraded_sample_keeps_width() {
        let catalog = ApiCatalog::from_names(["a.b", "c.d"]);
        let sample = Sample::new(
            "ghost",
            Label::BENIGN,
            "/nonexistent/scripts",
            "/nonexistent/ghost.dump",
        );

        let outcome = Pipeline::new(&catalog).process(&sample).unwrap();
        assert!(outcome.content_degraded);
        assert!(outcome.structural_degraded);
        assert_eq!(outcome.record.width(), 2 + TAXONOMY_LEN);
        assert_eq!(outcome.record.to_string(), "1 # ghost");
    }

    #[cfg(unix)]
    #[test]
    fn test_partial_script_scan_is_not_degraded() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let scripts = temp.path().join("outputs/delta");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("a.pcode"), "pushstring \"loadBytes\"\n").unwrap();
        let locked = scripts.join("b.pcode");
        fs::write(&locked, "pushstring \"loadBytes\"\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let enforced = fs::File::open(&locked).is_err();

        let catalog = ApiCatalog::from_names(["flash.display.Loader", "loadBytes"]);
        let sample = Sample::new(
            "delta",
            Label::MALICIOUS,
            &scripts,
            temp.path().join("outputs/dumps/delta.dump"),
        );
        let outcome = Pipeline::new(&catalog).process(&sample);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        let outcome = outcome.unwrap();
        assert!(!outcome.content_degraded);
        assert!(outcome.structural_degraded);
        let expected = if enforced { 1 } else { 2 };
        assert_eq!(outcome.record.content(), &[0, expected]);
    }

    #[test]
    fn test_output_order_follows_input() {
        let (_temp, catalog, samples) = fixture();
        let reversed: Vec<Sample> = samples.iter().rev().cloned().collect();
        let mut writer = RecordWriter::new(Vec::new());

        Pipeline::new(&catalog)
            .with_workers(3)
            .run(&reversed, &mut writer)
            .unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let ids: Vec<&str> = out
            .lines()
            .map(|l| l.rsplit("# ").next().unwrap())
            .collect();
        assert_eq!(ids, vec!["gamma", "beta", "alpha"]);
    }
}
