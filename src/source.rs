//! The URL source seam and its paging cursor.
//!
//! A source owns the data access (database queries, API calls, static lists).
//! The core only asks it for chunk cursors and then for the records behind
//! each cursor, passing the language explicitly on every call.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::UrlRecord;

/// Identifies one chunk of a source's URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkCursor {
    /// 0-based position of the chunk within the source.
    pub ordinal: usize,
    /// Row offset of the first record.
    pub offset: u64,
    /// Maximum records in this chunk, `None` when unbounded.
    pub limit: Option<NonZeroUsize>,
    /// Source-defined token (id range, query fragment, page id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ChunkCursor {
    /// A single cursor covering everything.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            ordinal: 0,
            offset: 0,
            limit: None,
            key: None,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Cursors for a source with `total` rows. Unbounded yields exactly one
    /// cursor; a bounded split of zero rows yields none.
    #[must_use]
    pub fn paginate(total: u64, limit: Option<NonZeroUsize>) -> Vec<Self> {
        let Some(limit) = limit else {
            return vec![Self::unbounded()];
        };
        let step = limit.get() as u64;
        (0..total.div_ceil(step))
            .map(|ordinal| Self {
                ordinal: ordinal as usize,
                offset: ordinal * step,
                limit: Some(limit),
                key: None,
            })
            .collect()
    }

    /// Slice `items` the way this cursor describes.
    #[must_use]
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset)
            .unwrap_or(usize::MAX)
            .min(items.len());
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit.get()).min(items.len()),
            None => items.len(),
        };
        &items[start..end]
    }
}

/// A logical URL collection rendered as one or more sitemap files per language.
pub trait SitemapSource {
    /// Name used in filenames: `{language}-{name}.xml`.
    fn name(&self) -> &str;

    /// Chunk cursors for `language`, each covering at most `limit` URLs.
    /// `None` asks for a single chunk. An empty list means the source has
    /// nothing to publish for this language.
    fn chunks(&self, language: &str, limit: Option<NonZeroUsize>) -> Result<Vec<ChunkCursor>>;

    /// Records behind one cursor, localized for `language`.
    fn urls(&self, language: &str, cursor: &ChunkCursor) -> Result<Vec<UrlRecord>>;
}

impl<S: SitemapSource + ?Sized> SitemapSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn chunks(&self, language: &str, limit: Option<NonZeroUsize>) -> Result<Vec<ChunkCursor>> {
        (**self).chunks(language, limit)
    }

    fn urls(&self, language: &str, cursor: &ChunkCursor) -> Result<Vec<UrlRecord>> {
        (**self).urls(language, cursor)
    }
}

/// In-memory source keyed by language.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    urls: BTreeMap<String, Vec<UrlRecord>>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            urls: BTreeMap::new(),
        }
    }

    /// Set the records published for `language`.
    #[must_use]
    pub fn with_urls<L, I>(mut self, language: L, records: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = UrlRecord>,
    {
        self.urls
            .insert(language.into(), records.into_iter().collect());
        self
    }

    fn records(&self, language: &str) -> &[UrlRecord] {
        self.urls.get(language).map_or(&[], Vec::as_slice)
    }
}

impl SitemapSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn chunks(&self, language: &str, limit: Option<NonZeroUsize>) -> Result<Vec<ChunkCursor>> {
        let records = self.records(language);
        if records.is_empty() {
            return Ok(Vec::new());
        }
        Ok(ChunkCursor::paginate(records.len() as u64, limit))
    }

    fn urls(&self, language: &str, cursor: &ChunkCursor) -> Result<Vec<UrlRecord>> {
        Ok(cursor.window(self.records(language)).to_vec())
    }
}
