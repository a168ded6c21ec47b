//! Index Command
//!
//! Appends a folder of samples to the paths file with a shared label.
//!
//! Usage:
//!   swfvec index samples/Malicious 0
//!   swfvec index samples/Benign 1 --paths paths.txt

use std::path::Path;

use crate::cli::Output;
use crate::dataset::SampleIndex;
use crate::types::{Label, Result, SwfvecError};

pub fn run(folder: &Path, label: &str, paths_file: &Path) -> Result<usize> {
    let label = Label::parse_binary(label)?;

    if !folder.is_dir() {
        return Err(SwfvecError::Config(format!(
            "Folder does not exist: {}",
            folder.display()
        )));
    }

    let written = SampleIndex::append_folder(folder, label, paths_file)?;

    Output::new().success(&format!(
        "Added {} {} samples to {}",
        written,
        label.name(),
        paths_file.display()
    ));

    Ok(written)
}
