//! Integration tests for full generation runs.
//! Tests: file naming, index contents, idempotence, stale-file cleanup, failure policies.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::Path;

use sitemap_core::{
    ChunkCursor, FailurePolicy, GenerationStatus, GeneratorOptions, PathAliases, Result,
    SitemapError, SitemapGenerator, SitemapSource, StaticSource, UrlRecord,
};
use tempfile::TempDir;

const BASE_URL: &str = "https://example.com";

fn options(dir: &Path) -> sitemap_core::GeneratorOptionsBuilder {
    GeneratorOptions::builder(dir.display().to_string(), BASE_URL)
}

fn read_dir_sorted(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    read_dir_sorted(dir)
        .into_iter()
        .map(|name| {
            let bytes = std::fs::read(dir.join(&name)).unwrap();
            (name, bytes)
        })
        .collect()
}

fn news_source() -> StaticSource {
    StaticSource::new("news").with_urls(
        "en",
        vec![
            UrlRecord::with_lastmod("https://example.com/en/news/a", 100),
            UrlRecord::with_lastmod("https://example.com/en/news/b", 300),
            UrlRecord::with_lastmod("https://example.com/en/news/c", 200),
        ],
    )
}

fn pages_source() -> StaticSource {
    StaticSource::new("pages")
        .with_urls("en", vec![UrlRecord::new("https://example.com/en/about")])
        .with_urls(
            "ar",
            vec![UrlRecord::with_lastmod("https://example.com/ar/about", 1_700_000_000)],
        )
}

/// Fails on the chunk with the given ordinal.
struct FlakySource {
    fail_at: usize,
}

impl SitemapSource for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    fn chunks(&self, _language: &str, limit: Option<NonZeroUsize>) -> Result<Vec<ChunkCursor>> {
        Ok(ChunkCursor::paginate(3, limit))
    }

    fn urls(&self, _language: &str, cursor: &ChunkCursor) -> Result<Vec<UrlRecord>> {
        if cursor.ordinal == self.fail_at {
            return Err(SitemapError::source_failure("flaky", "database went away"));
        }
        Ok(vec![UrlRecord::new(format!(
            "https://example.com/flaky/{}",
            cursor.ordinal
        ))])
    }
}

#[test]
fn chunked_source_matches_worked_example() {
    let dir = TempDir::new().unwrap();
    let generator = SitemapGenerator::builder(options(dir.path()).max_urls_per_file(2).build().unwrap())
        .source(news_source())
        .build()
        .unwrap();

    let report = generator.generate().unwrap();

    assert!(report.is_complete());
    assert_eq!(
        read_dir_sorted(dir.path()),
        vec!["en-news1.xml", "en-news2.xml", "sitemap.xml"]
    );
    let first = std::fs::read_to_string(dir.path().join("en-news1.xml")).unwrap();
    assert!(first.find("/news/b").unwrap() < first.find("/news/a").unwrap());
    assert!(!first.contains("/news/c"));
    let second = std::fs::read_to_string(dir.path().join("en-news2.xml")).unwrap();
    assert!(second.contains("/news/c"));
    assert_eq!(second.matches("<url>").count(), 1);
}

#[test]
fn unbounded_max_writes_single_file() {
    let dir = TempDir::new().unwrap();
    let generator = SitemapGenerator::builder(options(dir.path()).max_urls_per_file(0).build().unwrap())
        .source(news_source())
        .build()
        .unwrap();

    generator.generate().unwrap();

    assert_eq!(read_dir_sorted(dir.path()), vec!["en-news.xml", "sitemap.xml"]);
    let xml = std::fs::read_to_string(dir.path().join("en-news.xml")).unwrap();
    assert_eq!(xml.matches("<url>").count(), 3);
}

#[test]
fn index_lists_every_file_by_recency() {
    let dir = TempDir::new().unwrap();
    let generator = SitemapGenerator::builder(
        options(dir.path())
            .languages(["en", "ar"])
            .base_url_dir("sitemaps")
            .build()
            .unwrap(),
    )
    .source(news_source())
    .source(pages_source())
    .build()
    .unwrap();

    let report = generator.generate().unwrap();

    let locations: Vec<&str> = report.files.iter().map(|f| f.location.as_str()).collect();
    assert_eq!(
        locations,
        vec!["en-news.xml", "en-pages.xml", "ar-pages.xml", "sitemap.xml"]
    );
    let index = std::fs::read_to_string(dir.path().join("sitemap.xml")).unwrap();
    let own = index.find("https://example.com/sitemaps/sitemap.xml").unwrap();
    let ar = index.find("https://example.com/sitemaps/ar-pages.xml").unwrap();
    let news = index.find("https://example.com/sitemaps/en-news.xml").unwrap();
    let pages = index.find("https://example.com/sitemaps/en-pages.xml").unwrap();
    assert!(own < ar, "index is stamped with the run time");
    assert!(ar < news, "newest file first");
    assert!(news < pages, "undated file last");
    assert_eq!(index.matches("<sitemap>").count(), 4);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let build = || {
        SitemapGenerator::builder(
            options(dir.path())
                .languages(["en", "ar"])
                .max_urls_per_file(2)
                .build()
                .unwrap(),
        )
        .source(news_source())
        .source(pages_source())
        .build()
        .unwrap()
    };

    build().generate().unwrap();
    let first = snapshot(dir.path());
    let report = build().generate().unwrap();
    let second = snapshot(dir.path());

    assert_eq!(first, second);
    assert!(report.cleanup.unwrap().removed.is_empty());
}

#[test]
fn removed_source_files_are_cleaned_up() {
    let dir = TempDir::new().unwrap();
    SitemapGenerator::builder(options(dir.path()).max_urls_per_file(2).build().unwrap())
        .source(news_source())
        .source(pages_source())
        .build()
        .unwrap()
        .generate()
        .unwrap();
    assert_eq!(
        read_dir_sorted(dir.path()),
        vec!["en-news1.xml", "en-news2.xml", "en-pages.xml", "sitemap.xml"]
    );

    let report = SitemapGenerator::builder(options(dir.path()).max_urls_per_file(2).build().unwrap())
        .source(pages_source())
        .build()
        .unwrap()
        .generate()
        .unwrap();

    assert_eq!(read_dir_sorted(dir.path()), vec!["en-pages.xml", "sitemap.xml"]);
    assert_eq!(report.cleanup.unwrap().removed.len(), 2);
}

#[test]
fn shrinking_chunk_count_drops_numbered_files() {
    let dir = TempDir::new().unwrap();
    let run = |max: usize| {
        SitemapGenerator::builder(options(dir.path()).max_urls_per_file(max).build().unwrap())
            .source(news_source())
            .build()
            .unwrap()
            .generate()
            .unwrap()
    };

    run(1);
    assert_eq!(
        read_dir_sorted(dir.path()),
        vec!["en-news1.xml", "en-news2.xml", "en-news3.xml", "sitemap.xml"]
    );
    run(10);
    assert_eq!(read_dir_sorted(dir.path()), vec!["en-news.xml", "sitemap.xml"]);
}

#[test]
fn lenient_policy_keeps_partial_output_and_continues() {
    let dir = TempDir::new().unwrap();
    let generator = SitemapGenerator::builder(options(dir.path()).max_urls_per_file(1).build().unwrap())
        .source(FlakySource { fail_at: 2 })
        .source(pages_source())
        .build()
        .unwrap();

    let report = generator.generate().unwrap();

    assert_eq!(report.status, GenerationStatus::Partial);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, "flaky");
    assert_eq!(report.failures[0].files_written, 2);
    assert_eq!(
        read_dir_sorted(dir.path()),
        vec!["en-flaky1.xml", "en-flaky2.xml", "en-pages.xml", "sitemap.xml"]
    );
}

#[test]
fn strict_policy_propagates_first_failure() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("en-old.xml"), b"stale").unwrap();
    let generator = SitemapGenerator::builder(
        options(dir.path())
            .max_urls_per_file(1)
            .failure_policy(FailurePolicy::Strict)
            .build()
            .unwrap(),
    )
    .source(FlakySource { fail_at: 0 })
    .source(pages_source())
    .build()
    .unwrap();

    let err = generator.generate().unwrap_err();

    assert!(matches!(err, SitemapError::Source { .. }));
    // Nothing reconciled, no index written.
    assert_eq!(read_dir_sorted(dir.path()), vec!["en-old.xml"]);
}

#[test]
fn deferred_cleanup_preserves_previous_files_on_failure() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("en-flaky3.xml"), b"previous run").unwrap();
    let generator = SitemapGenerator::builder(
        options(dir.path())
            .max_urls_per_file(1)
            .defer_cleanup_on_failure(true)
            .build()
            .unwrap(),
    )
    .source(FlakySource { fail_at: 2 })
    .build()
    .unwrap();

    let report = generator.generate().unwrap();

    assert_eq!(report.status, GenerationStatus::CleanupDeferred);
    assert!(report.cleanup.is_none());
    assert!(dir.path().join("en-flaky3.xml").exists());
}

#[test]
fn missing_output_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("public");
    let generator = SitemapGenerator::builder(options(&missing).build().unwrap())
        .source(news_source())
        .build()
        .unwrap();

    assert!(matches!(
        generator.generate(),
        Err(SitemapError::DirectoryUnavailable { .. })
    ));
    assert!(!missing.exists());
}

#[test]
fn output_directory_can_be_created_on_demand() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("public");
    let generator = SitemapGenerator::builder(
        options(&missing).create_output_directory(true).build().unwrap(),
    )
    .source(news_source())
    .build()
    .unwrap();

    generator.generate().unwrap();

    assert_eq!(read_dir_sorted(&missing), vec!["en-news.xml", "sitemap.xml"]);
}

#[test]
fn aliased_output_directory_is_expanded() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("maps")).unwrap();
    let generator = SitemapGenerator::builder(
        GeneratorOptions::builder("@webroot/maps", BASE_URL).build().unwrap(),
    )
    .aliases(PathAliases::new().with_alias("@webroot", dir.path()))
    .source(news_source())
    .build()
    .unwrap();

    let report = generator.generate().unwrap();

    assert_eq!(report.output_directory, dir.path().join("maps"));
    assert!(dir.path().join("maps/en-news.xml").exists());
}

#[test]
fn duplicate_source_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let err = SitemapGenerator::builder(options(dir.path()).build().unwrap())
        .source(news_source())
        .source(StaticSource::new("news"))
        .build()
        .unwrap_err();
    assert!(matches!(err, SitemapError::InvalidOptions { .. }));
}

#[test]
fn held_lock_blocks_a_second_run() {
    let out = TempDir::new().unwrap();
    let locks = TempDir::new().unwrap();
    let lock_path = locks.path().join("sitemap.lock");
    let generator = SitemapGenerator::builder(
        options(out.path()).lock_path(&lock_path).build().unwrap(),
    )
    .source(news_source())
    .build()
    .unwrap();

    let held = sitemap_core::RunLock::acquire(&lock_path).unwrap();
    assert!(matches!(generator.generate(), Err(SitemapError::Lock(_))));
    drop(held);
    assert!(generator.generate().unwrap().is_complete());
}

#[test]
fn dotted_names_are_rejected_before_anything_is_written() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        options(dir.path()).index_filename(".sitemap.xml").build(),
        Err(SitemapError::InvalidOptions { .. })
    ));
    let err = SitemapGenerator::builder(options(dir.path()).build().unwrap())
        .source(StaticSource::new(".news"))
        .build()
        .unwrap_err();
    assert!(matches!(err, SitemapError::InvalidOptions { .. }));
    assert!(read_dir_sorted(dir.path()).is_empty());
}

#[test]
fn index_filename_colliding_with_a_sitemap_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = SitemapGenerator::builder(
        options(dir.path()).index_filename("en-news2.xml").build().unwrap(),
    )
    .source(news_source())
    .build()
    .unwrap_err();
    assert!(matches!(err, SitemapError::InvalidOptions { .. }));
}

#[test]
fn lock_inside_output_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    let generator = SitemapGenerator::builder(
        options(dir.path())
            .lock_path(dir.path().join("sitemap.lock"))
            .build()
            .unwrap(),
    )
    .source(news_source())
    .build()
    .unwrap();

    assert!(matches!(
        generator.generate(),
        Err(SitemapError::InvalidOptions { .. })
    ));
    assert!(read_dir_sorted(dir.path()).is_empty());
}
