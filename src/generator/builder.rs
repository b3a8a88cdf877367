//! Per-(source, language) sitemap building.
//!
//! Chunks are fetched in the order the source returns them. Each non-empty
//! chunk is sorted newest-first and written as one file. The first rendered
//! chunk is held back until a second non-empty chunk shows up, which decides
//! between `{lang}-{name}.xml` and the numbered `{lang}-{name}{n}.xml` form.

use std::num::NonZeroUsize;

use crate::constants::SITEMAP_EXTENSION;
use crate::document::render_urlset;
use crate::error::{Result, SitemapError};
use crate::io::FileSink;
use crate::lastmod::LastmodFormat;
use crate::source::{ChunkCursor, SitemapSource};
use crate::types::{GeneratedFile, UrlRecord, sort_by_recency};

/// Shared state for every build in a run.
pub(crate) struct BuildContext<'a> {
    pub sink: &'a FileSink,
    pub format: &'a LastmodFormat,
    pub limit: Option<NonZeroUsize>,
}

/// Files written for one pair, plus the error that stopped it early.
#[derive(Debug, Default)]
pub(crate) struct SourceBuild {
    pub files: Vec<GeneratedFile>,
    pub failure: Option<SitemapError>,
}

struct RenderedChunk {
    bytes: Vec<u8>,
    lastmod: i64,
    urls: usize,
}

impl RenderedChunk {
    fn render(records: &[UrlRecord], format: &LastmodFormat) -> Result<Self> {
        Ok(Self {
            bytes: render_urlset(records, format)?,
            lastmod: records
                .iter()
                .filter_map(|record| record.lastmod)
                .max()
                .unwrap_or(0)
                .max(0),
            urls: records.len(),
        })
    }
}

/// `{language}-{name}{index}.xml`, or without the index when `None`.
#[must_use]
pub fn sitemap_filename(language: &str, source_name: &str, index: Option<usize>) -> String {
    match index {
        Some(index) => format!("{language}-{source_name}{index}.{SITEMAP_EXTENSION}"),
        None => format!("{language}-{source_name}.{SITEMAP_EXTENSION}"),
    }
}

pub(crate) fn build_source(
    source: &dyn SitemapSource,
    language: &str,
    ctx: &BuildContext<'_>,
) -> SourceBuild {
    let mut build = SourceBuild::default();
    if let Err(err) = build_into(source, language, ctx, &mut build.files) {
        build.failure = Some(err);
    }
    build
}

fn build_into(
    source: &dyn SitemapSource,
    language: &str,
    ctx: &BuildContext<'_>,
    files: &mut Vec<GeneratedFile>,
) -> Result<()> {
    let name = source.name();
    let cursors = source.chunks(language, ctx.limit)?;
    if cursors.is_empty() {
        tracing::debug!(
            target = "sitemap::builder",
            source = name,
            language,
            "source has no chunks; skipping"
        );
        return Ok(());
    }

    let mut pending: Option<RenderedChunk> = None;
    for cursor in &cursors {
        let chunk = match fetch_chunk(source, language, cursor, ctx) {
            Ok(Some(chunk)) => chunk,
            Ok(None) => continue,
            Err(err) => {
                // Chunks before the failure stay published; a held-back first
                // chunk belongs to a multi-file source at this point.
                if let Some(first) = pending.take() {
                    emit(ctx, files, first, sitemap_filename(language, name, Some(1)))?;
                }
                return Err(err);
            }
        };
        if pending.is_none() && files.is_empty() {
            pending = Some(chunk);
            continue;
        }
        if let Some(first) = pending.take() {
            emit(ctx, files, first, sitemap_filename(language, name, Some(1)))?;
        }
        let index = files.len() + 1;
        emit(ctx, files, chunk, sitemap_filename(language, name, Some(index)))?;
    }
    if let Some(only) = pending {
        emit(ctx, files, only, sitemap_filename(language, name, None))?;
    }
    Ok(())
}

fn fetch_chunk(
    source: &dyn SitemapSource,
    language: &str,
    cursor: &ChunkCursor,
    ctx: &BuildContext<'_>,
) -> Result<Option<RenderedChunk>> {
    let mut records = source.urls(language, cursor)?;
    if records.is_empty() {
        tracing::debug!(
            target = "sitemap::builder",
            source = source.name(),
            language,
            ordinal = cursor.ordinal,
            "empty chunk skipped"
        );
        return Ok(None);
    }
    if let Some(limit) = ctx.limit {
        if records.len() > limit.get() {
            return Err(SitemapError::ChunkOverflow {
                source_name: source.name().to_string(),
                ordinal: cursor.ordinal,
                limit: limit.get(),
                actual: records.len(),
            });
        }
    }
    sort_by_recency(&mut records);
    RenderedChunk::render(&records, ctx.format).map(Some)
}

fn emit(
    ctx: &BuildContext<'_>,
    files: &mut Vec<GeneratedFile>,
    chunk: RenderedChunk,
    filename: String,
) -> Result<()> {
    ctx.sink.persist(&filename, &chunk.bytes)?;
    tracing::debug!(
        target = "sitemap::builder",
        file = %filename,
        urls = chunk.urls,
        lastmod = chunk.lastmod,
        "sitemap written"
    );
    files.push(GeneratedFile::new(filename, chunk.lastmod));
    Ok(())
}
