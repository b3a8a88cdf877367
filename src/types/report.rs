//! Reports returned by a generation run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::record::GeneratedFile;

/// A (language, source) pair whose build stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub language: String,
    pub source: String,
    pub error: String,
    /// Files of this pair that were written before the failure.
    pub files_written: usize,
}

/// Outcome of the stale-file pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Entries deleted (or, in dry-run mode, that would have been deleted).
    pub removed: Vec<PathBuf>,
    /// Entries left alone because they are directories or have non-UTF-8 names.
    pub skipped: Vec<PathBuf>,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Every pair built, index written, cleanup done.
    Complete,
    /// At least one pair failed; index and cleanup still ran.
    Partial,
    /// At least one pair failed and cleanup was deferred.
    CleanupDeferred,
}

/// Summary of one [`crate::SitemapGenerator::generate`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub status: GenerationStatus,
    pub output_directory: PathBuf,
    /// Manifest in encounter order; the index is the last entry.
    pub files: Vec<GeneratedFile>,
    pub failures: Vec<SourceFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<CleanupReport>,
    pub duration_ms: u64,
}

impl GenerationReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == GenerationStatus::Complete
    }
}
