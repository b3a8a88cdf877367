//! Builder-style options controlling a generation run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_INDEX_FILENAME, DEFAULT_LANGUAGE, DEFAULT_MAX_URLS_PER_FILE,
    PROTOCOL_MAX_URLS_PER_FILE,
};
use crate::error::{Result, SitemapError};
use crate::lastmod::LastmodFormat;

fn default_true() -> bool {
    true
}

fn default_index_filename() -> String {
    DEFAULT_INDEX_FILENAME.to_string()
}

fn default_languages() -> Vec<String> {
    vec![DEFAULT_LANGUAGE.to_string()]
}

fn default_max_urls_per_file() -> usize {
    DEFAULT_MAX_URLS_PER_FILE
}

/// How the generator reacts when one (language, source) pair fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and continue with the next pair.
    #[default]
    Lenient,
    /// Abort the run on the first failure.
    Strict,
}

/// Configuration for [`crate::SitemapGenerator`].
///
/// Sources are not part of the options; they are registered on the
/// generator builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Directory receiving every sitemap file. May start with an alias
    /// (`@webroot/sitemaps`) or `~`.
    pub output_directory: String,
    /// Scheme and host (optionally a path) prefixed to index `<loc>` values.
    pub base_url: String,
    /// Optional path segment between `base_url` and the filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url_dir: Option<String>,
    #[serde(default = "default_index_filename")]
    pub index_filename: String,
    #[serde(default)]
    pub lastmod_format: LastmodFormat,
    /// Languages processed in order.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Upper bound on URLs per file. 0 disables chunking.
    #[serde(default = "default_max_urls_per_file")]
    pub max_urls_per_file: usize,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Write each file through a temporary sibling and rename it into place.
    #[serde(default = "default_true")]
    pub atomic_writes: bool,
    #[serde(default)]
    pub create_output_directory: bool,
    /// Skip stale-file removal when any source failed during a lenient run.
    #[serde(default)]
    pub defer_cleanup_on_failure: bool,
    /// Report stale files without deleting them.
    #[serde(default)]
    pub dry_run_cleanup: bool,
    /// Advisory lock file held for the duration of a run. Must live outside
    /// the output directory, or the cleanup pass would remove it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_path: Option<PathBuf>,
}

impl GeneratorOptions {
    pub fn new(output_directory: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            output_directory: output_directory.into(),
            base_url: base_url.into(),
            base_url_dir: None,
            index_filename: default_index_filename(),
            lastmod_format: LastmodFormat::default(),
            languages: default_languages(),
            max_urls_per_file: default_max_urls_per_file(),
            failure_policy: FailurePolicy::default(),
            atomic_writes: true,
            create_output_directory: false,
            defer_cleanup_on_failure: false,
            dry_run_cleanup: false,
            lock_path: None,
        }
    }

    /// Start a fluent builder for `GeneratorOptions`.
    pub fn builder(
        output_directory: impl Into<String>,
        base_url: impl Into<String>,
    ) -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder {
            inner: Self::new(output_directory, base_url),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs_err::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Chunk bound passed to sources; `None` means a single unbounded chunk.
    #[must_use]
    pub fn chunk_limit(&self) -> Option<std::num::NonZeroUsize> {
        std::num::NonZeroUsize::new(self.max_urls_per_file)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(invalid("base_url must not be empty"));
        }
        if self.output_directory.trim().is_empty() {
            return Err(invalid("output_directory must not be empty"));
        }
        validate_filename(&self.index_filename)?;
        if self.languages.is_empty() {
            return Err(invalid("at least one language is required"));
        }
        let mut seen = HashSet::new();
        for language in &self.languages {
            if language.trim().is_empty() {
                return Err(invalid("language codes must not be empty"));
            }
            if language.contains(['/', '\\']) {
                return Err(invalid(format!(
                    "language code `{language}` contains a path separator"
                )));
            }
            reject_dotted_edges("language code", language)?;
            if !seen.insert(language.as_str()) {
                return Err(invalid(format!("language `{language}` is listed twice")));
            }
        }
        if self.max_urls_per_file > PROTOCOL_MAX_URLS_PER_FILE {
            tracing::warn!(
                target = "sitemap::options",
                max_urls_per_file = self.max_urls_per_file,
                protocol_limit = PROTOCOL_MAX_URLS_PER_FILE,
                "max_urls_per_file exceeds the sitemaps.org limit"
            );
        }
        Ok(())
    }
}

fn validate_filename(name: &str) -> Result<()> {
    if name.trim_matches('.').is_empty() {
        return Err(invalid("index_filename must not be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid(format!(
            "index_filename `{name}` must be a bare filename"
        )));
    }
    reject_dotted_edges("index_filename", name)
}

/// Cleanup matches directory entries with their edge dots stripped, so
/// fragments of generated filenames must not start or end with `.`.
pub(crate) fn reject_dotted_edges(what: &str, value: &str) -> Result<()> {
    if value.starts_with('.') || value.ends_with('.') {
        return Err(invalid(format!(
            "{what} `{value}` must not start or end with `.`"
        )));
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> SitemapError {
    SitemapError::InvalidOptions {
        reason: reason.into(),
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorOptionsBuilder {
    inner: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    pub fn base_url_dir<S: Into<String>>(mut self, dir: S) -> Self {
        self.inner.base_url_dir = Some(dir.into());
        self
    }

    pub fn index_filename<S: Into<String>>(mut self, name: S) -> Self {
        self.inner.index_filename = name.into();
        self
    }

    #[must_use]
    pub fn lastmod_format(mut self, format: LastmodFormat) -> Self {
        self.inner.lastmod_format = format;
        self
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn max_urls_per_file(mut self, max: usize) -> Self {
        self.inner.max_urls_per_file = max;
        self
    }

    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.inner.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn atomic_writes(mut self, enabled: bool) -> Self {
        self.inner.atomic_writes = enabled;
        self
    }

    #[must_use]
    pub fn create_output_directory(mut self, enabled: bool) -> Self {
        self.inner.create_output_directory = enabled;
        self
    }

    #[must_use]
    pub fn defer_cleanup_on_failure(mut self, enabled: bool) -> Self {
        self.inner.defer_cleanup_on_failure = enabled;
        self
    }

    #[must_use]
    pub fn dry_run_cleanup(mut self, enabled: bool) -> Self {
        self.inner.dry_run_cleanup = enabled;
        self
    }

    pub fn lock_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.inner.lock_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<GeneratorOptions> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
