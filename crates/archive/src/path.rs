// SPDX-License-Identifier: MIT

//! Archive file layout (§4.6 "Layout"): one JSONL file per
//! `(source, ref, date)` at `<baseDir>/<source>/<ref>.<YYYYMMDD>.jsonl`.

use msghub_core::yyyymmdd_utc;
use std::path::{Path, PathBuf};

/// Identifies a single archive file, independent of backend or base dir.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchivePath {
    pub source: String,
    pub r#ref: String,
    pub date: String,
}

impl ArchivePath {
    pub fn new(source: &str, r#ref: &str, ts: u64) -> Self {
        Self { source: source.to_string(), r#ref: r#ref.to_string(), date: yyyymmdd_utc(ts) }
    }

    /// The queue key used to serialize writes to this file (§4.6
    /// "Concurrency"): one FIFO lane per distinct path.
    pub fn queue_key(&self) -> String {
        format!("{}/{}/{}", self.source, self.r#ref, self.date)
    }

    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(&self.source)
    }

    pub fn file_name(&self, ext: &str) -> String {
        format!("{}.{}.{}", self.r#ref, self.date, ext)
    }

    pub fn full_path(&self, base_dir: &Path, ext: &str) -> PathBuf {
        base_dir.join(self.relative_dir()).join(self.file_name(ext))
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
