//! Persisting rendered documents into the output directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;

use crate::error::{Result, SitemapError};

/// Writes rendered documents under a fixed directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    atomic: bool,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>, atomic: bool) -> Self {
        Self {
            dir: dir.into(),
            atomic,
        }
    }

    /// Create or overwrite `{dir}/{filename}` and return the bytes written.
    /// Writing nothing counts as a failure.
    pub fn persist(&self, filename: &str, bytes: &[u8]) -> Result<usize> {
        let path = self.dir.join(filename);
        let written = if self.atomic {
            write_atomic(&path, bytes)
        } else {
            fs_err::write(&path, bytes).map(|()| bytes.len())
        }
        .map_err(|source| SitemapError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        if written == 0 {
            return Err(SitemapError::EmptyWrite { path });
        }
        tracing::debug!(
            target = "sitemap::io",
            path = %path.display(),
            bytes = written,
            atomic = self.atomic,
            "persisted sitemap document"
        );
        Ok(written)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<usize> {
    let mut file = AtomicWriteFile::open(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.commit()?;
    Ok(bytes.len())
}
