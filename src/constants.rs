//! Global Constants
//!
//! Centralized constants for input formats and defaults.
//! Marker strings here are part of the decompiler's output format and
//! must match it byte for byte.

/// Script listing constants
pub mod script {
    /// A line must contain one of these to carry a symbolic name reference
    pub const NAME_MARKERS: &[&str] = &["Qname", "RTQname", "Multiname", "pushstring"];

    /// Housekeeping files skipped during the folder walk
    pub const DEFAULT_SKIP_NAMES: &[&str] = &[".DS_Store"];

    /// Separator joining a namespace and a local name
    pub const QUALIFIER: &str = ".";
}

/// Structural dump constants
pub mod dump {
    /// Every record line in the dump carries this field
    pub const RECORD_TOKEN: &str = "len=";

    /// Substring flagging a tag the decompiler failed to parse
    pub const ERROR_TAG: &str = "ErrorTag";
}

/// Sample layout defaults (mirrors the decompiler export tree)
pub mod layout {
    pub const DEFAULT_OUTPUTS_DIR: &str = "outputs";
    pub const DEFAULT_DUMPS_DIR: &str = "dumps";
    pub const DEFAULT_DUMP_EXTENSION: &str = "dump";

    /// Extension stripped from file names to build sample identifiers
    pub const SAMPLE_EXTENSION: &str = ".swf";
}

/// Default file names
pub mod files {
    pub const DEFAULT_CATALOG: &str = "complete_api_list";
    pub const DEFAULT_PATHS_FILE: &str = "paths.txt";
    pub const DEFAULT_OUTPUT: &str = "features.libsvm";
    pub const PROJECT_CONFIG: &str = "swfvec.toml";
}

/// Sparse record format
pub mod record {
    /// Separates the feature pairs from the trailing sample identifier
    pub const COMMENT_MARKER: &str = "#";
}

/// Batch pipeline constants
pub mod pipeline {
    /// Samples scanned in parallel before their records are flushed
    pub const CHUNK_SIZE: usize = 256;

    /// Emit a progress line every this many samples
    pub const PROGRESS_INTERVAL: usize = 100;
}
