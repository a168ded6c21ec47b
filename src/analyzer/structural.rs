//! Structural Scanner
//!
//! Counts container tags in a decompiler tag dump against a fixed taxonomy
//! of 14 categories. Only record lines (those containing `len=`) are
//! considered, and every category predicate is evaluated on every record
//! line: a line can count in several categories. `DefineButton` counts as
//! both a script and a button.
//!
//! Matching is plain substring containment, so `DefineShape4` also matches
//! the `DefineShape` pattern and `DefineButton2` matches `DefineButton`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::dump::{ERROR_TAG, RECORD_TOKEN};
use crate::types::{Result, StructuralVector, SwfvecError};

/// Number of taxonomy columns in every record
pub const TAXONOMY_LEN: usize = 14;

/// Tag categories in column order
///
/// The order is part of the output format: category `i` is written at
/// column `N + i + 1` where `N` is the catalog size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TagCategory {
    Frames,
    Shapes,
    Sounds,
    BinaryData,
    Scripts,
    Fonts,
    Sprites,
    MorphShapes,
    Texts,
    Images,
    Buttons,
    Videos,
    ErrorTag,
    Unknown,
}

impl TagCategory {
    pub const ALL: [TagCategory; TAXONOMY_LEN] = [
        TagCategory::Frames,
        TagCategory::Shapes,
        TagCategory::Sounds,
        TagCategory::BinaryData,
        TagCategory::Scripts,
        TagCategory::Fonts,
        TagCategory::Sprites,
        TagCategory::MorphShapes,
        TagCategory::Texts,
        TagCategory::Images,
        TagCategory::Buttons,
        TagCategory::Videos,
        TagCategory::ErrorTag,
        TagCategory::Unknown,
    ];

    /// Position in the taxonomy
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TagCategory::Frames => "frames",
            TagCategory::Shapes => "shapes",
            TagCategory::Sounds => "sounds",
            TagCategory::BinaryData => "binary_data",
            TagCategory::Scripts => "scripts",
            TagCategory::Fonts => "fonts",
            TagCategory::Sprites => "sprites",
            TagCategory::MorphShapes => "morph_shapes",
            TagCategory::Texts => "texts",
            TagCategory::Images => "images",
            TagCategory::Buttons => "buttons",
            TagCategory::Videos => "videos",
            TagCategory::ErrorTag => "errorTag",
            TagCategory::Unknown => "unknown",
        }
    }

    /// Tag name substrings that place a record in this category
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            TagCategory::Frames => &["ShowFrame"],
            TagCategory::Shapes => &["DefineShape", "DefineShape2", "DefineShape3", "DefineShape4"],
            TagCategory::Sounds => &[
                "DefineSound",
                "SoundStreamHead1",
                "SoundStreamHead-2",
                "SoundStreamBlock",
            ],
            TagCategory::BinaryData => &["DefineBinaryData"],
            TagCategory::Scripts => &[
                "DoABC",
                "DoABCDefine",
                "DoInitAction",
                "DoAction",
                "DefineButton",
            ],
            TagCategory::Fonts => &[
                "DefineFont",
                "DefineFont2",
                "DefineFont3",
                "DefineCompactedFont",
                "DefineFontInfo",
                "DefineFontInfo2",
                "DefineFontName",
            ],
            TagCategory::Sprites => &["DefineSprite"],
            TagCategory::MorphShapes => &["DefineMorphShape", "DefineMorphShape2"],
            TagCategory::Texts => &["DefineText", "DefineText2", "DefineEditText"],
            TagCategory::Images => &[
                "DefineBits",
                "JPEGTables",
                "DefineBitsJPEG2",
                "DefineBitsJPEG3",
                "DefineBitsJPEG4",
                "DefineBitsLossless1",
                "DefineBitsLossless2",
            ],
            TagCategory::Buttons => &["DefineButton", "DefineButton2"],
            TagCategory::Videos => &["DefineVideoStream", "VideoFrame"],
            TagCategory::ErrorTag => &[ERROR_TAG],
            TagCategory::Unknown => &["Unknown"],
        }
    }

    pub fn matches(self, line: &str) -> bool {
        self.patterns().iter().any(|p| line.contains(p))
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Counts plus the tag lengths seen per category
#[derive(Debug, Clone, Serialize)]
pub struct StructuralScan {
    pub counts: StructuralVector,
    /// `len=` values per category, in taxonomy order
    pub lengths: Vec<Vec<u64>>,
    /// Record lines seen (lines containing `len=`)
    pub records: usize,
}

impl StructuralScan {
    fn new() -> Self {
        Self {
            counts: StructuralVector::zeroed(TAXONOMY_LEN),
            lengths: vec![Vec::new(); TAXONOMY_LEN],
            records: 0,
        }
    }
}

/// Streams tag dumps; stateless, one instance can serve any number of samples
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralScanner;

impl StructuralScanner {
    pub fn new() -> Self {
        Self
    }

    /// Count the categories of every record line in `path`
    pub fn scan(&self, path: &Path) -> Result<StructuralVector> {
        self.scan_detailed(path).map(|scan| scan.counts)
    }

    /// Like `scan`, also collecting tag lengths
    pub fn scan_detailed(&self, path: &Path) -> Result<StructuralScan> {
        let file = File::open(path).map_err(|e| SwfvecError::dump_read(path, e))?;
        let mut reader = BufReader::new(file);
        let mut scan = StructuralScan::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| SwfvecError::dump_read(path, e))?;
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            if Self::record_line(&line, &mut scan) && line.contains(ERROR_TAG) {
                warn!("Found ErrorTag in dump {}", path.display());
            }
        }

        debug!(
            "Scanned dump {} ({} records, {} tags counted)",
            path.display(),
            scan.records,
            scan.counts.total()
        );

        Ok(scan)
    }

    /// Count one line into `counts`; returns false for non-record lines
    pub fn count_line(line: &str, counts: &mut StructuralVector) -> bool {
        if !line.contains(RECORD_TOKEN) {
            return false;
        }

        for category in TagCategory::ALL {
            if category.matches(line) {
                counts.increment(category.index());
            }
        }
        true
    }

    fn record_line(line: &str, scan: &mut StructuralScan) -> bool {
        if !Self::count_line(line, &mut scan.counts) {
            return false;
        }
        scan.records += 1;

        if let Some(length) = tag_length(line) {
            for category in TagCategory::ALL {
                if category.matches(line) {
                    scan.lengths[category.index()].push(length);
                }
            }
        }
        true
    }
}

/// First all-digit token after `len=`
pub fn tag_length(line: &str) -> Option<u64> {
    let (_, rest) = line.split_once(RECORD_TOKEN)?;
    rest.split_whitespace()
        .find(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|token| token.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn counts_of(lines: &[&str]) -> StructuralVector {
        let mut counts = StructuralVector::zeroed(TAXONOMY_LEN);
        for line in lines {
            StructuralScanner::count_line(line, &mut counts);
        }
        counts
    }

    #[test]
    fn test_taxonomy_order() {
        let names: Vec<_> = TagCategory::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "frames",
                "shapes",
                "sounds",
                "binary_data",
                "scripts",
                "fonts",
                "sprites",
                "morph_shapes",
                "texts",
                "images",
                "buttons",
                "videos",
                "errorTag",
                "unknown"
            ]
        );
        for (i, category) in TagCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_define_button_counts_twice() {
        let counts = counts_of(&["DefineButton (7) len=120"]);
        assert_eq!(counts.get(TagCategory::Scripts.index()), Some(1));
        assert_eq!(counts.get(TagCategory::Buttons.index()), Some(1));
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_line_without_len_is_ignored() {
        let counts = counts_of(&["DefineSprite (39) chid=3", "ShowFrame"]);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_substring_semantics() {
        let counts = counts_of(&["DefineShape4 len=10", "DefineMorphShape2 len=3"]);
        assert_eq!(counts.get(TagCategory::Shapes.index()), Some(1));
        // "DefineMorphShape" does not contain "DefineShape"
        assert_eq!(counts.get(TagCategory::MorphShapes.index()), Some(1));

        let counts = counts_of(&["DefineBitsJPEG3 len=99"]);
        assert_eq!(counts.get(TagCategory::Images.index()), Some(1));

        let counts = counts_of(&["DefineFontAlignZones len=4"]);
        assert_eq!(counts.get(TagCategory::Fonts.index()), Some(1));
    }

    #[test]
    fn test_repeated_records_accumulate() {
        let counts = counts_of(&["ShowFrame len=0"; 3]);
        assert_eq!(counts.get(TagCategory::Frames.index()), Some(3));
    }

    #[test]
    fn test_tag_length() {
        assert_eq!(tag_length("DoABC (82) len=1024 flags=1"), Some(1024));
        assert_eq!(tag_length("DoABC   len=  77"), Some(77));
        assert_eq!(tag_length("DoABC len=abc 5"), Some(5));
        assert_eq!(tag_length("DoABC len=abc"), None);
        assert_eq!(tag_length("DoABC"), None);
    }

    #[test]
    fn test_scan_dump_file() {
        let temp = TempDir::new().unwrap();
        let dump = temp.path().join("sample.dump");
        fs::write(
            &dump,
            "[HEADER] File: sample.swf\n\
             FileAttributes (69) len=4\n\
             DoABC (82) len=2048\n\
             DefineBinaryData (87) len=5000\n\
             ShowFrame (1) len=0\n\
             ErrorTag (12) len=8\n\
             Unknown (255) len=3\n",
        )
        .unwrap();

        let scan = StructuralScanner::new().scan_detailed(&dump).unwrap();
        assert_eq!(scan.records, 6);
        assert_eq!(scan.counts.len(), TAXONOMY_LEN);
        assert_eq!(scan.counts.get(TagCategory::Scripts.index()), Some(1));
        assert_eq!(scan.counts.get(TagCategory::BinaryData.index()), Some(1));
        assert_eq!(scan.counts.get(TagCategory::Frames.index()), Some(1));
        assert_eq!(scan.counts.get(TagCategory::ErrorTag.index()), Some(1));
        assert_eq!(scan.counts.get(TagCategory::Unknown.index()), Some(1));
        assert_eq!(scan.lengths[TagCategory::BinaryData.index()], vec![5000]);
    }

    #[test]
    fn test_missing_dump_is_read_error() {
        let temp = TempDir::new().unwrap();
        let err = StructuralScanner::new()
            .scan(&temp.path().join("absent.dump"))
            .unwrap_err();
        assert!(matches!(err, SwfvecError::DumpRead { .. }));
        assert!(err.is_recoverable());
    }
}
