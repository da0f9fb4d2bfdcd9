use std::time::Duration;
use thiserror::Error;

use crate::Pattern;

/// Why a single resource could not be retrieved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("response is not text ({0})")]
    NotText(String),

    #[error("response too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl RetrievalError {
    /// Failures worth another attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

/// A pattern that failed to compile, or failed while being matched.
#[derive(Debug, Error)]
#[error("invalid pattern `{pattern}`: {source}")]
pub struct PatternError {
    pub pattern: Pattern,
    #[source]
    pub source: fancy_regex::Error,
}
