#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;

pub mod dedup;
pub mod diagnostic;
pub mod error;
pub mod fetcher;
pub mod generation;
pub mod grouper;
pub mod matcher;
pub mod model;
pub mod pipeline;
pub mod session;

pub use dedup::dedup_records;
pub use diagnostic::Diagnostic;
pub use error::{PatternError, RetrievalError};
pub use fetcher::{ContentSource, FetchOptions, FetchOutput, ResourceFetcher};
pub use generation::{Generation, GenerationCounter};
pub use grouper::group_records;
pub use matcher::{MatchOutput, compile_pattern, match_patterns};
pub use model::{Group, MatchRecord, Pattern, Resource};
pub use pipeline::{Analysis, RunOutcome, ScanPipeline, ScanReport, analyze};
pub use session::ScanSession;

/// Owner of the persisted, ordered pattern list.
///
/// Identity is the exact pattern string. Duplicates are allowed.
#[async_trait]
pub trait PatternStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Vec<Pattern>>;
    async fn append(&self, pattern: Pattern) -> anyhow::Result<()>;
    /// Removes the first entry equal to `pattern`. Returns whether one was removed.
    async fn remove(&self, pattern: &Pattern) -> anyhow::Result<bool>;
}

/// Source of the resource identifiers that make up "the current page".
#[async_trait]
pub trait ResourceLocator: Send + Sync {
    async fn primary_url(&self) -> anyhow::Result<String>;
    async fn referenced_urls(&self) -> anyhow::Result<Vec<String>>;
}

/// Renders a finished scan for display.
pub trait Presenter {
    fn render(&self, patterns: &[Pattern], report: &ScanReport) -> anyhow::Result<String>;
}
