//! Sample and label types

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SwfvecError;

/// Ground-truth label written as the first field of every record
///
/// Labels are integers only. `0` and `1` are the malicious/benign scheme used
/// when generating a paths file; loading accepts any `i32` so callers can use
/// their own scheme. The value is written back in canonical decimal form, so
/// `+1` becomes `1`, and non-integer text such as `0.5` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(i32);

impl Label {
    pub const MALICIOUS: Self = Self(0);
    pub const BENIGN: Self = Self(1);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    /// Parse a label restricted to the malicious/benign scheme
    pub fn parse_binary(s: &str) -> Result<Self, SwfvecError> {
        match s.trim().parse::<Self>()? {
            label @ (Self::MALICIOUS | Self::BENIGN) => Ok(label),
            _ => Err(SwfvecError::InvalidLabel(format!(
                "{} (expected 0 for malicious or 1 for benign)",
                s.trim()
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MALICIOUS => "malicious",
            Self::BENIGN => "benign",
            _ => "custom",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Label {
    type Err = SwfvecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| SwfvecError::InvalidLabel(s.trim().to_string()))
    }
}

/// One analyzed artifact and the locations of its decompiled outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    /// Identifier written as the trailing comment of the record
    pub id: String,
    pub label: Label,
    /// Directory holding the decompiled scripts
    pub script_dir: PathBuf,
    /// Structural tag dump
    pub dump_path: PathBuf,
}

impl Sample {
    pub fn new(
        id: impl Into<String>,
        label: Label,
        script_dir: impl Into<PathBuf>,
        dump_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            label,
            script_dir: script_dir.into(),
            dump_path: dump_path.into(),
        }
    }
}
