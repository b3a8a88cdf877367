//! Sitemap index construction.

use crate::document::render_index;
use crate::error::Result;
use crate::io::FileSink;
use crate::types::{GeneratedFile, GeneratorOptions, Manifest};

/// `{base_url}[/{base_url_dir}]` with no trailing slash.
#[must_use]
pub fn loc_prefix(base_url: &str, base_url_dir: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match base_url_dir.map(|dir| dir.trim_matches('/')) {
        Some(dir) if !dir.is_empty() => format!("{base}/{dir}"),
        _ => base.to_string(),
    }
}

/// Write the index for `manifest` and return its own manifest entry,
/// stamped with `now`. The index lists itself alongside the sitemaps.
pub(crate) fn build_index(
    manifest: &Manifest,
    options: &GeneratorOptions,
    sink: &FileSink,
    now: i64,
) -> Result<GeneratedFile> {
    let own_entry = GeneratedFile::new(options.index_filename.clone(), now);
    let mut listed = manifest.clone();
    listed.push(own_entry.clone());
    let entries = listed.sorted_by_recency();
    let prefix = loc_prefix(&options.base_url, options.base_url_dir.as_deref());
    let bytes = render_index(&entries, &prefix, &options.lastmod_format)?;
    sink.persist(&options.index_filename, &bytes)?;
    tracing::info!(
        target = "sitemap::index",
        file = %options.index_filename,
        entries = entries.len(),
        "sitemap index written"
    );
    Ok(own_entry)
}
