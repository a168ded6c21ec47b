//! Extract Command
//!
//! Builds the sparse feature file for every sample in the paths file.

use std::path::PathBuf;

use tracing::info;

use crate::analyzer::ApiCatalog;
use crate::cli::Output;
use crate::config::Config;
use crate::dataset::{BatchSummary, Pipeline, RecordWriter, SampleIndex};
use crate::types::Result;

/// Command-line overrides for the extraction section of the config
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub paths: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub outputs_dir: Option<PathBuf>,
    pub workers: Option<usize>,
    pub overwrite: bool,
}

impl ExtractOptions {
    /// Fold the overrides into `config`
    pub fn apply(self, mut config: Config) -> Result<Config> {
        if let Some(paths) = self.paths {
            config.extraction.paths_file = paths;
        }
        if let Some(catalog) = self.catalog {
            config.catalog.path = catalog;
        }
        if let Some(output) = self.output {
            config.extraction.output = output;
        }
        if let Some(outputs_dir) = self.outputs_dir {
            config.layout.outputs_dir = outputs_dir;
        }
        if let Some(workers) = self.workers {
            config.extraction.workers = workers;
        }
        if self.overwrite {
            config.extraction.append = false;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn run(config: &Config) -> Result<BatchSummary> {
    let output = Output::new();

    // No catalog, no schema: fail before touching any sample
    let catalog = ApiCatalog::load(&config.catalog.path, config.catalog.duplicates)?;
    info!(
        "Loaded {} APIs from {}",
        catalog.len(),
        config.catalog.path.display()
    );

    let index = SampleIndex::load(&config.extraction.paths_file, &config.layout)?;

    let mut writer = RecordWriter::create(&config.extraction.output, config.extraction.append)?;
    let summary = Pipeline::new(&catalog)
        .with_skip_names(config.layout.skip_names.clone())
        .with_workers(config.extraction.workers)
        .run(&index.samples, &mut writer)?;
    writer.flush()?;

    output.success(&format!(
        "Wrote {} records to {}",
        summary.written,
        config.extraction.output.display()
    ));
    output.field("Columns", catalog.len() + crate::analyzer::TAXONOMY_LEN);
    if index.missing > 0 {
        output.warning(&format!(
            "{} samples in {} not found on disk",
            index.missing,
            config.extraction.paths_file.display()
        ));
    }
    if summary.degraded_content > 0 {
        output.warning(&format!(
            "{} samples without scripts (content features zero)",
            summary.degraded_content
        ));
    }
    if summary.degraded_structural > 0 {
        output.warning(&format!(
            "{} samples without a readable dump (structural features zero)",
            summary.degraded_structural
        ));
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
    fn test_options_override_config() {
        let options = ExtractOptions {
            output: Some(PathBuf::from("out.libsvm")),
            workers: Some(4),
            overwrite: true,
            ..Default::default()
        };
        let config = options.apply(Config::default()).unwrap();
        assert_eq!(config.extraction.output, PathBuf::from("out.libsvm"));
        assert_eq!(config.extraction.workers, 4);
        assert!(!config.extraction.append);
        assert_eq!(config.catalog.path, PathBuf::from("complete_api_list"));
    }

    #[test]
    fn test_missing_catalog_aborts_before_output() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("features.libsvm");
        let config = ExtractOptions {
            catalog: Some(temp.path().join("absent_list")),
            output: Some(output.clone()),
            ..Default::default()
        }
        .apply(Config::default())
        .unwrap();

        let err = run(&config).unwrap_err();
        assert!(matches!(err, SwfvecError::CatalogLoad { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_end_to_end() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("list"), "flash.net.URLLoader\n").unwrap();
        fs::write(root.join("clip.swf"), b"FWS").unwrap();
        fs::write(
            root.join("paths.txt"),
            format!("1 {} clip.swf\n", root.join("clip.swf").display()),
        )
        .unwrap();
        fs::create_dir_all(root.join("outputs/clip")).unwrap();
        fs::write(
            root.join("outputs/clip/a.pcode"),
            "getlex Qname(PackageNamespace(\"flash.net\"),\"URLLoader\")\n",
        )
        .unwrap();

        let output = root.join("features.libsvm");
        let config = ExtractOptions {
            paths: Some(root.join("paths.txt")),
            catalog: Some(root.join("list")),
            output: Some(output.clone()),
            outputs_dir: Some(root.join("outputs")),
            overwrite: true,
            ..Default::default()
        }
        .apply(Config::default())
        .unwrap();

        let summary = run(&config).unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.degraded_structural, 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "1 1:1 # clip\n");
    }
}
