//! URL records and the per-run manifest of generated files.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One `<url>` entry supplied by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub url: String,
    /// Unix timestamp (seconds) of the last modification, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<i64>,
}

impl UrlRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            lastmod: None,
        }
    }

    pub fn with_lastmod(url: impl Into<String>, lastmod: i64) -> Self {
        Self {
            url: url.into(),
            lastmod: Some(lastmod),
        }
    }
}

/// Anything that carries a recency key for the descending lastmod sort.
pub trait Recency {
    /// Timestamp used for ordering; missing and pre-epoch values count as 0.
    fn recency(&self) -> i64;
}

impl Recency for UrlRecord {
    fn recency(&self) -> i64 {
        self.lastmod.unwrap_or(0).max(0)
    }
}

impl Recency for GeneratedFile {
    fn recency(&self) -> i64 {
        self.lastmod.max(0)
    }
}

/// Stable sort by recency, newest first. Ties keep their input order.
pub fn sort_by_recency<T: Recency>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.recency()));
}

/// A physical file written during the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Filename relative to the output directory.
    pub location: String,
    /// Newest lastmod among the file's records, 0 when unknown.
    pub lastmod: i64,
}

impl GeneratedFile {
    pub fn new(location: impl Into<String>, lastmod: i64) -> Self {
        Self {
            location: location.into(),
            lastmod,
        }
    }
}

/// Ordered list of files produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    entries: Vec<GeneratedFile>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: GeneratedFile) {
        self.entries.push(file);
    }

    pub fn extend<I: IntoIterator<Item = GeneratedFile>>(&mut self, files: I) {
        self.entries.extend(files);
    }

    #[must_use]
    pub fn entries(&self) -> &[GeneratedFile] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order: newest first, encounter order on ties.
    #[must_use]
    pub fn sorted_by_recency(&self) -> Vec<GeneratedFile> {
        let mut sorted = self.entries.clone();
        sort_by_recency(&mut sorted);
        sorted
    }

    #[must_use]
    pub fn locations(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .map(|entry| entry.location.as_str())
            .collect()
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<GeneratedFile> {
        self.entries
    }
}
