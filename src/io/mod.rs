//! Filesystem plumbing: document persistence and directory checks.

pub mod persist;

use std::path::Path;

use crate::error::{Result, SitemapError};

pub use persist::FileSink;

/// Fail with [`SitemapError::DirectoryUnavailable`] unless `dir` is an
/// existing, listable directory. With `create`, missing directories are
/// created first.
pub fn ensure_output_directory(dir: &Path, create: bool) -> Result<()> {
    if create {
        fs_err::create_dir_all(dir).map_err(|source| SitemapError::DirectoryUnavailable {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let metadata = fs_err::metadata(dir).map_err(|source| SitemapError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(SitemapError::DirectoryUnavailable {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        });
    }
    fs_err::read_dir(dir).map_err(|source| SitemapError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(())
}
