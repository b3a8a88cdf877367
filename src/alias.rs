//! Expansion of `@alias` and `~` prefixes in configured paths.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, SitemapError};

/// Host-supplied alias table, e.g. `@webroot -> /srv/www/public`.
#[derive(Debug, Clone, Default)]
pub struct PathAliases {
    aliases: BTreeMap<String, PathBuf>,
}

impl PathAliases {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias. The leading `@` is optional.
    #[must_use]
    pub fn with_alias(mut self, alias: impl AsRef<str>, target: impl Into<PathBuf>) -> Self {
        let name = alias.as_ref().trim_start_matches('@').to_string();
        self.aliases.insert(name, target.into());
        self
    }

    /// Expand a configured path.
    ///
    /// - `@name` or `@name/rest` resolves through the alias table.
    /// - `~` or `~/rest` resolves against the home directory.
    /// - Anything else is returned unchanged.
    pub fn expand(&self, raw: &str) -> Result<PathBuf> {
        if let Some(stripped) = raw.strip_prefix('@') {
            let (name, rest) = split_first_segment(stripped);
            let base = self
                .aliases
                .get(name)
                .ok_or_else(|| SitemapError::UnknownAlias {
                    alias: format!("@{name}"),
                })?;
            return Ok(join_rest(base, rest));
        }
        if raw == "~" || raw.starts_with("~/") {
            let home = dirs_next::home_dir().ok_or_else(|| SitemapError::UnknownAlias {
                alias: "~".to_string(),
            })?;
            return Ok(join_rest(&home, raw[1..].trim_start_matches('/')));
        }
        Ok(PathBuf::from(raw))
    }
}

fn split_first_segment(value: &str) -> (&str, &str) {
    match value.split_once('/') {
        Some((name, rest)) => (name, rest),
        None => (value, ""),
    }
}

fn join_rest(base: &Path, rest: &str) -> PathBuf {
    if rest.is_empty() {
        base.to_path_buf()
    } else {
        base.join(rest)
    }
}
