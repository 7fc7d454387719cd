use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::Error;

/// Names of the four tables that share one prefix.
///
/// Only `<prefix>_data` is mandatory; the others are read on demand by their
/// respective accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSet {
    prefix: String,
    data: String,
    fieldinfo: String,
    globalinfo: String,
    params: String,
}

impl TableSet {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            data: format!("{}_data", prefix),
            fieldinfo: format!("{}_fieldinfo", prefix),
            globalinfo: format!("{}_globalinfo", prefix),
            params: format!("{}_params", prefix),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Main data table, one row per record.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn fieldinfo(&self) -> &str {
        &self.fieldinfo
    }

    pub fn globalinfo(&self) -> &str {
        &self.globalinfo
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

/// The three AE file kinds and their naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Primary event data (hits, status, labels)
    Pri,
    /// Transient waveform data
    Tra,
    /// Transient feature data
    Trf,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::Pri, FileKind::Tra, FileKind::Trf];

    pub fn prefix(self) -> &'static str {
        match self {
            FileKind::Pri => "pri",
            FileKind::Tra => "tra",
            FileKind::Trf => "trf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Pri => "pridb",
            FileKind::Tra => "tradb",
            FileKind::Trf => "trfdb",
        }
    }

    pub fn tables(self) -> TableSet {
        TableSet::new(self.prefix())
    }

    /// Infer the kind from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Accepts either the table prefix (`pri`) or the extension (`pridb`).
impl FromStr for FileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.prefix().eq_ignore_ascii_case(s) || kind.extension().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| Error::UnknownFileKind(s.to_string()))
    }
}
