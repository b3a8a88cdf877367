//! Protocol constants and configuration defaults.

/// XML namespace shared by `<urlset>` and `<sitemapindex>` documents.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Filename of the sitemap index inside the output directory.
pub const DEFAULT_INDEX_FILENAME: &str = "sitemap.xml";

/// strftime pattern used for `<lastmod>` values (W3C date, day precision).
pub const DEFAULT_LASTMOD_FORMAT: &str = "%Y-%m-%d";

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default chunk bound. Kept under the protocol hard limit so hosts can
/// append a few URLs per file without re-chunking.
pub const DEFAULT_MAX_URLS_PER_FILE: usize = 45_000;

/// Hard limit on `<url>` entries per file imposed by sitemaps.org.
pub const PROTOCOL_MAX_URLS_PER_FILE: usize = 50_000;

/// Extension of every generated sitemap file.
pub const SITEMAP_EXTENSION: &str = "xml";

/// Indentation width of rendered documents.
pub(crate) const XML_INDENT: usize = 4;
