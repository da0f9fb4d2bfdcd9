//! Per-resource and per-pattern failures surfaced next to the results.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Pattern, PatternError, RetrievalError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    RetrievalFailure { url: String, reason: String },
    PatternCompileFailure { pattern: Pattern, reason: String },
    PatternMatchFailure {
        pattern: Pattern,
        url: String,
        reason: String,
    },
}

impl Diagnostic {
    #[must_use]
    pub fn retrieval(url: impl Into<String>, error: &RetrievalError) -> Self {
        Self::RetrievalFailure {
            url: url.into(),
            reason: error.to_string(),
        }
    }

    #[must_use]
    pub fn pattern(error: &PatternError) -> Self {
        Self::PatternCompileFailure {
            pattern: error.pattern.clone(),
            reason: error.source.to_string(),
        }
    }

    /// A compiled pattern that gave up part way through one resource.
    #[must_use]
    pub fn pattern_match(url: impl Into<String>, error: &PatternError) -> Self {
        Self::PatternMatchFailure {
            pattern: error.pattern.clone(),
            url: url.into(),
            reason: error.source.to_string(),
        }
    }

    #[must_use]
    pub const fn is_retrieval_failure(&self) -> bool {
        matches!(self, Self::RetrievalFailure { .. })
    }

    #[must_use]
    pub const fn is_pattern_failure(&self) -> bool {
        matches!(
            self,
            Self::PatternCompileFailure { .. } | Self::PatternMatchFailure { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetrievalFailure { url, reason } => {
                write!(f, "failed to load {url}: {reason}")
            }
            Self::PatternCompileFailure { pattern, reason } => {
                write!(f, "pattern `{pattern}` is invalid: {reason}")
            }
            Self::PatternMatchFailure {
                pattern,
                url,
                reason,
            } => {
                write!(f, "pattern `{pattern}` stopped on {url}: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let d = Diagnostic::retrieval("https://a.test/x.js", &RetrievalError::Status(500));
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["kind"], "retrieval_failure");
        assert_eq!(value["url"], "https://a.test/x.js");
        assert_eq!(value["reason"], "HTTP status 500");
    }

    #[test]
    fn display_names_the_pattern() {
        let d = Diagnostic::PatternCompileFailure {
            pattern: Pattern::from("("),
            reason: "unclosed group".into(),
        };
        assert!(d.to_string().contains("`(`"));
        assert!(d.is_pattern_failure());
        assert!(!d.is_retrieval_failure());
    }

    #[test]
    fn match_failure_keeps_url_and_counts_as_pattern_failure() {
        let error = PatternError {
            pattern: Pattern::from("(a+)+$"),
            source: fancy_regex::Error::RuntimeError(
                fancy_regex::RuntimeError::BacktrackLimitExceeded,
            ),
        };
        let d = Diagnostic::pattern_match("https://a.test/app.js", &error);

        assert!(d.is_pattern_failure());
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["kind"], "pattern_match_failure");
        assert_eq!(value["url"], "https://a.test/app.js");
        assert!(d.to_string().contains("stopped on https://a.test/app.js"));
    }
}
