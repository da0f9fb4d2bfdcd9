//! Data model shared by every pipeline stage.
//!
//! All values here are rebuilt from scratch on each run; only the pattern
//! list outlives a run, and it is owned by a [`crate::PatternStore`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A regular-expression source string as entered by the user.
///
/// Equality is exact string equality, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(String);

impl Pattern {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Pattern {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A retrieved text artifact.
///
/// `content` is `None` when retrieval failed. Such a resource contributes no
/// matches; it is never an error for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub url: String,
    pub content: Option<String>,
}

impl Resource {
    #[must_use]
    pub fn loaded(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: Some(content.into()),
        }
    }

    #[must_use]
    pub fn absent(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
        }
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.content.is_none()
    }
}

/// One occurrence of a pattern inside a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRecord {
    pub pattern: Pattern,
    pub url: String,
    pub text: String,
}

impl MatchRecord {
    #[must_use]
    pub fn new(pattern: Pattern, url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            pattern,
            url: url.into(),
            text: text.into(),
        }
    }

    /// True when `other` belongs to the same display group.
    #[must_use]
    pub fn same_group(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.url == other.url
    }
}

/// A display unit: every deduplicated match sharing one `(pattern, url)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub pattern: Pattern,
    pub url: String,
    pub matches: Vec<String>,
}
