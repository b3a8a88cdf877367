//! `<lastmod>` formatting.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LASTMOD_FORMAT;
use crate::error::{Result, SitemapError};

/// A strftime pattern that chrono is known to accept.
///
/// Timestamps are rendered in UTC so output does not depend on the host
/// timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LastmodFormat(String);

impl LastmodFormat {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !Self::is_valid(&pattern) {
            return Err(SitemapError::InvalidLastmodFormat { format: pattern });
        }
        Ok(Self(pattern))
    }

    #[must_use]
    pub fn is_valid(pattern: &str) -> bool {
        !pattern.is_empty() && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render a unix timestamp (seconds).
    pub fn format(&self, timestamp: i64) -> Result<String> {
        let datetime: DateTime<Utc> = DateTime::from_timestamp(timestamp, 0)
            .ok_or(SitemapError::InvalidTimestamp { timestamp })?;
        let mut rendered = String::new();
        write!(rendered, "{}", datetime.format(&self.0)).map_err(|_| {
            SitemapError::InvalidLastmodFormat {
                format: self.0.clone(),
            }
        })?;
        Ok(rendered)
    }
}

impl Default for LastmodFormat {
    fn default() -> Self {
        Self(DEFAULT_LASTMOD_FORMAT.to_string())
    }
}

impl TryFrom<String> for LastmodFormat {
    type Error = SitemapError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LastmodFormat> for String {
    fn from(value: LastmodFormat) -> Self {
        value.0
    }
}

impl std::fmt::Display for LastmodFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
