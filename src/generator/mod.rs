//! Orchestration of a full generation run.
//!
//! A run walks every configured language and, inside each language, every
//! registered source. Each pair is built into zero or more sitemap files,
//! then the index is written over the resulting manifest, and finally the
//! output directory is reconciled against that manifest.
//!
//! Runs against one directory must not overlap: cleanup deletes anything it
//! does not recognize, including files a concurrent run is still writing.
//! Set [`GeneratorOptions::lock_path`] to enforce this with an advisory lock.

mod builder;
pub mod cleanup;
mod index;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use tracing::instrument;

use crate::alias::PathAliases;
use crate::constants::SITEMAP_EXTENSION;
use crate::error::{Result, SitemapError};
use crate::io::{FileSink, ensure_output_directory};
use crate::lock::RunLock;
use crate::source::SitemapSource;
use crate::types::options::reject_dotted_edges;
use crate::types::{
    FailurePolicy, GenerationReport, GenerationStatus, GeneratorOptions, Manifest, SourceFailure,
};

pub use builder::sitemap_filename;
pub use cleanup::reconcile;
pub use index::loc_prefix;

use builder::{BuildContext, build_source};

/// Generates the sitemap file set for a host application.
pub struct SitemapGenerator {
    options: GeneratorOptions,
    sources: Vec<Box<dyn SitemapSource>>,
    aliases: PathAliases,
}

impl std::fmt::Debug for SitemapGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SitemapGenerator")
            .field("options", &self.options)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl SitemapGenerator {
    #[must_use]
    pub fn builder(options: GeneratorOptions) -> SitemapGeneratorBuilder {
        SitemapGeneratorBuilder {
            options,
            sources: Vec::new(),
            aliases: PathAliases::default(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Output directory after alias expansion.
    pub fn output_directory(&self) -> Result<PathBuf> {
        self.aliases.expand(&self.options.output_directory)
    }

    /// Run one full pass: build every (language, source) pair, write the
    /// index, then remove stale files.
    ///
    /// Fails immediately when the output directory is unavailable. Pair
    /// failures follow [`GeneratorOptions::failure_policy`].
    #[instrument(
        skip(self),
        fields(
            languages = self.options.languages.len(),
            sources = self.sources.len()
        )
    )]
    pub fn generate(&self) -> Result<GenerationReport> {
        let started = Instant::now();
        let dir = self.output_directory()?;
        if let Some(lock_path) = self.options.lock_path.as_deref() {
            ensure_lock_outside(lock_path, &dir)?;
        }
        let _lock = self
            .options
            .lock_path
            .as_deref()
            .map(RunLock::acquire)
            .transpose()?;
        ensure_output_directory(&dir, self.options.create_output_directory)?;

        let sink = FileSink::new(&dir, self.options.atomic_writes);
        let ctx = BuildContext {
            sink: &sink,
            format: &self.options.lastmod_format,
            limit: self.options.chunk_limit(),
        };

        let mut manifest = Manifest::new();
        let mut failures = Vec::new();
        for language in &self.options.languages {
            for source in &self.sources {
                let build = build_source(&**source, language, &ctx);
                let files_written = build.files.len();
                manifest.extend(build.files);

                let Some(err) = build.failure else {
                    continue;
                };
                if self.options.failure_policy == FailurePolicy::Strict || !err.is_source_scoped()
                {
                    return Err(err);
                }
                tracing::warn!(
                    target = "sitemap::generator",
                    language = %language,
                    source = source.name(),
                    files_written,
                    error = %err,
                    "sitemap source failed; continuing"
                );
                failures.push(SourceFailure {
                    language: language.clone(),
                    source: source.name().to_string(),
                    error: err.to_string(),
                    files_written,
                });
            }
        }

        let index_entry = index::build_index(
            &manifest,
            &self.options,
            &sink,
            Utc::now().timestamp(),
        )?;
        manifest.push(index_entry);

        let defer_cleanup = !failures.is_empty() && self.options.defer_cleanup_on_failure;
        let cleanup = if defer_cleanup {
            tracing::warn!(
                target = "sitemap::generator",
                failures = failures.len(),
                "stale-file cleanup deferred after source failures"
            );
            None
        } else {
            Some(reconcile(
                &dir,
                &manifest.locations(),
                self.options.dry_run_cleanup,
            )?)
        };

        let status = match (failures.is_empty(), defer_cleanup) {
            (true, _) => GenerationStatus::Complete,
            (false, true) => GenerationStatus::CleanupDeferred,
            (false, false) => GenerationStatus::Partial,
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            target = "sitemap::generator",
            dir = %dir.display(),
            files = manifest.len(),
            failures = failures.len(),
            removed = cleanup.as_ref().map_or(0, |c| c.removed.len()),
            duration_ms,
            ?status,
            "sitemap generation finished"
        );

        Ok(GenerationReport {
            status,
            output_directory: dir,
            files: manifest.into_entries(),
            failures,
            cleanup,
            duration_ms,
        })
    }
}

/// Whether `filename` is `{language}-{source}.xml` or `{language}-{source}{n}.xml`.
fn is_generated_name(filename: &str, language: &str, source_name: &str) -> bool {
    let Some(stem) = filename.strip_suffix(&format!(".{SITEMAP_EXTENSION}")) else {
        return false;
    };
    stem.strip_prefix(&format!("{language}-{source_name}"))
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

/// Cleanup would delete a lock file living in the output directory.
fn ensure_lock_outside(lock_path: &Path, dir: &Path) -> Result<()> {
    let lock_dir = match lock_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let inside = lock_path.starts_with(dir)
        || match (fs_err::canonicalize(lock_dir), fs_err::canonicalize(dir)) {
            (Ok(lock_dir), Ok(dir)) => lock_dir.starts_with(dir),
            _ => false,
        };
    if inside {
        return Err(SitemapError::InvalidOptions {
            reason: format!(
                "lock_path {} must live outside the output directory {}",
                lock_path.display(),
                dir.display()
            ),
        });
    }
    Ok(())
}

pub struct SitemapGeneratorBuilder {
    options: GeneratorOptions,
    sources: Vec<Box<dyn SitemapSource>>,
    aliases: PathAliases,
}

impl SitemapGeneratorBuilder {
    /// Register a source. Sources are processed in registration order.
    #[must_use]
    pub fn source<S: SitemapSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    #[must_use]
    pub fn boxed_source(mut self, source: Box<dyn SitemapSource>) -> Self {
        self.sources.push(source);
        self
    }

    #[must_use]
    pub fn aliases(mut self, aliases: PathAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn build(self) -> Result<SitemapGenerator> {
        self.options.validate()?;
        let mut seen = HashSet::new();
        for source in &self.sources {
            let name = source.name();
            if name.trim().is_empty() || name.contains(['/', '\\']) {
                return Err(SitemapError::InvalidOptions {
                    reason: format!("source name `{name}` is not a valid filename fragment"),
                });
            }
            reject_dotted_edges("source name", name)?;
            if !seen.insert(name.to_string()) {
                return Err(SitemapError::InvalidOptions {
                    reason: format!("source `{name}` is registered twice"),
                });
            }
            for language in &self.options.languages {
                if is_generated_name(&self.options.index_filename, language, name) {
                    return Err(SitemapError::InvalidOptions {
                        reason: format!(
                            "index_filename `{}` collides with the sitemaps of `{language}-{name}`",
                            self.options.index_filename
                        ),
                    });
                }
            }
        }
        if self.sources.is_empty() {
            tracing::warn!(
                target = "sitemap::generator",
                "no sitemap sources registered; the index will be empty"
            );
        }
        Ok(SitemapGenerator {
            options: self.options,
            sources: self.sources,
            aliases: self.aliases,
        })
    }
}
