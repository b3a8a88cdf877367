#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::cast_possible_truncation
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers are self-describing; public entry
// points carry their own docs.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Cursor offsets and chunk ordinals are bounded by in-memory record counts.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
//
#![allow(clippy::needless_pass_by_value)] // Builders take owned values intentionally
#![allow(clippy::return_self_not_must_use)] // Builder patterns don't need must_use on every method
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::similar_names)]

//! Sitemap generation for host applications.
//!
//! The host registers [`SitemapSource`] implementations, one per logical URL
//! collection, and calls [`SitemapGenerator::generate`]. Each run:
//!
//! 1. builds `{language}-{source}[N].xml` files, splitting sources into
//!    chunks of at most `max_urls_per_file` URLs;
//! 2. writes the sitemap index, newest files first;
//! 3. deletes files in the output directory that the run did not produce.
//!
//! ```no_run
//! use sitemap_core::{GeneratorOptions, SitemapGenerator, StaticSource, UrlRecord};
//!
//! # fn main() -> sitemap_core::Result<()> {
//! let options = GeneratorOptions::builder("/srv/www/public", "https://example.com")
//!     .languages(["en", "ar"])
//!     .build()?;
//! let news = StaticSource::new("news")
//!     .with_urls("en", vec![UrlRecord::with_lastmod("https://example.com/en/news/1", 1_700_000_000)]);
//! let report = SitemapGenerator::builder(options).source(news).build()?.generate()?;
//! assert!(report.is_complete());
//! # Ok(())
//! # }
//! ```

/// The sitemap-core crate version (matches `Cargo.toml`).
pub const SITEMAP_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod alias;
pub mod constants;
pub mod document;
pub mod error;
pub mod generator;
pub mod io;
pub mod lastmod;
mod lock;
pub mod source;
pub mod types;

pub use alias::PathAliases;
pub use constants::*;
pub use document::{render_index, render_urlset};
pub use error::{Result, SitemapError};
pub use generator::{
    SitemapGenerator, SitemapGeneratorBuilder, loc_prefix, reconcile, sitemap_filename,
};
pub use lastmod::LastmodFormat;
pub use lock::RunLock;
pub use source::{ChunkCursor, SitemapSource, StaticSource};
pub use types::{
    CleanupReport, FailurePolicy, GeneratedFile, GenerationReport, GenerationStatus,
    GeneratorOptions, GeneratorOptionsBuilder, Manifest, Recency, SourceFailure, UrlRecord,
    sort_by_recency,
};
