//! Error type shared by every stage of a generation run.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SitemapError>;

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("output directory {path} is unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write sitemap file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sitemap file {path} was written with zero bytes")]
    EmptyWrite { path: PathBuf },

    #[error("sitemap source `{source_name}` failed: {reason}")]
    Source { source_name: String, reason: String },

    #[error(
        "sitemap source `{source_name}` returned {actual} urls for chunk {ordinal} (limit {limit})"
    )]
    ChunkOverflow {
        source_name: String,
        ordinal: usize,
        limit: usize,
        actual: usize,
    },

    #[error("failed to remove stale sitemap entry {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("xml serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid lastmod format `{format}`")]
    InvalidLastmodFormat { format: String },

    #[error("timestamp {timestamp} is out of range")]
    InvalidTimestamp { timestamp: i64 },

    #[error("invalid generator options: {reason}")]
    InvalidOptions { reason: String },

    #[error("unknown path alias `{alias}`")]
    UnknownAlias { alias: String },

    #[error("failed to parse generator options: {0}")]
    Config(#[from] serde_json::Error),

    #[error("lock error: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SitemapError {
    /// Build a [`SitemapError::Source`] from any displayable failure raised by
    /// a source implementation.
    pub fn source_failure(source_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Source {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the failure is confined to a single source and the run may
    /// continue under the lenient policy.
    #[must_use]
    pub fn is_source_scoped(&self) -> bool {
        matches!(
            self,
            Self::WriteFailed { .. }
                | Self::EmptyWrite { .. }
                | Self::Source { .. }
                | Self::ChunkOverflow { .. }
                | Self::Xml(_)
                | Self::InvalidTimestamp { .. }
        )
    }
}
