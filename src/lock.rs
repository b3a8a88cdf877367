//! Advisory lock serializing generation runs against one output directory.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Result, SitemapError};

/// Exclusive lock held for the lifetime of the value.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Open (creating if needed) and exclusively lock `path` without blocking.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|err| {
                SitemapError::Lock(format!("cannot open lock file {}: {err}", path.display()))
            })?;
        FileExt::try_lock_exclusive(&file).map_err(|err| {
            SitemapError::Lock(format!(
                "another generation run holds {}: {err}",
                path.display()
            ))
        })?;
        tracing::debug!(target = "sitemap::lock", path = %path.display(), "acquired run lock");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            tracing::warn!(
                target = "sitemap::lock",
                path = %self.path.display(),
                error = %err,
                "failed to release run lock"
            );
        }
    }
}
