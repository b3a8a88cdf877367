//! Removal of files left behind by earlier runs.
//!
//! The output directory is treated as owned by the generator: every entry
//! that is not part of the current manifest is an orphan. An entry is kept
//! when either its name or its name stripped of leading and trailing `.`
//! characters is in the manifest, so `.sitemap.xml` counts as `sitemap.xml`
//! and a bare `.`/`..` is never a candidate.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, SitemapError};
use crate::types::CleanupReport;

/// Delete every entry of `dir` whose name, raw or trimmed, is not in `keep`.
///
/// Sub-directories and entries with non-UTF-8 names are left alone and
/// listed in [`CleanupReport::skipped`]. Nothing happens when `keep` is empty.
pub fn reconcile(dir: &Path, keep: &HashSet<&str>, dry_run: bool) -> Result<CleanupReport> {
    let mut report = CleanupReport {
        dry_run,
        ..CleanupReport::default()
    };
    if keep.is_empty() {
        return Ok(report);
    }

    let unavailable = |source: std::io::Error| SitemapError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs_err::read_dir(dir)
        .map_err(unavailable)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(unavailable)?;
    entries.sort_by_key(fs_err::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::warn!(
                target = "sitemap::cleanup",
                path = %path.display(),
                "skipping entry with non-UTF-8 name"
            );
            report.skipped.push(path);
            continue;
        };
        let trimmed = name.trim_matches('.');
        if trimmed.is_empty() || keep.contains(name) || keep.contains(trimmed) {
            continue;
        }
        let is_dir = entry
            .file_type()
            .map_err(|source| SitemapError::Cleanup {
                path: path.clone(),
                source,
            })?
            .is_dir();
        if is_dir {
            tracing::debug!(
                target = "sitemap::cleanup",
                path = %path.display(),
                "skipping directory"
            );
            report.skipped.push(path);
            continue;
        }
        if !dry_run {
            fs_err::remove_file(&path).map_err(|source| SitemapError::Cleanup {
                path: path.clone(),
                source,
            })?;
        }
        tracing::info!(
            target = "sitemap::cleanup",
            path = %path.display(),
            dry_run,
            "removed stale sitemap file"
        );
        report.removed.push(path);
    }
    Ok(report)
}
