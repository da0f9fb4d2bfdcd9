//! One full scan: fetch, match, dedup, group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    ContentSource, Diagnostic, FetchOptions, Generation, GenerationCounter, Group, Pattern,
    Resource, ResourceFetcher, dedup_records, group_records, match_patterns,
};

/// Result of the synchronous stages over already-fetched resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub groups: Vec<Group>,
    pub diagnostics: Vec<Diagnostic>,
    pub raw_matches: usize,
}

/// Run matching, dedup and grouping. Never suspends, never fails.
#[must_use]
pub fn analyze(patterns: &[Pattern], resources: &[Resource]) -> Analysis {
    let matched = match_patterns(patterns, resources);
    let raw_matches = matched.records.len();
    let groups = group_records(dedup_records(matched.records));
    Analysis {
        groups,
        diagnostics: matched.diagnostics,
        raw_matches,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub generation: Generation,
    /// The pattern snapshot this run evaluated.
    pub patterns: Vec<Pattern>,
    pub urls: Vec<String>,
    pub groups: Vec<Group>,
    /// Retrieval failures first, in URL order, then pattern failures in list order.
    pub diagnostics: Vec<Diagnostic>,
    pub raw_matches: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanReport {
    /// A completed run that found nothing. Not a failure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn failed_resources(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.is_retrieval_failure())
            .count()
    }

    /// Patterns that did not compile. Match-time failures are not counted.
    #[must_use]
    pub fn invalid_patterns(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::PatternCompileFailure { .. }))
            .count()
    }

    #[must_use]
    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No newer run started while this one was in flight.
    Current(ScanReport),
    /// Superseded by `latest`; the report was discarded.
    Stale {
        generation: Generation,
        latest: Generation,
    },
}

impl RunOutcome {
    #[must_use]
    pub fn into_report(self) -> Option<ScanReport> {
        match self {
            Self::Current(report) => Some(report),
            Self::Stale { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

pub struct ScanPipeline<S> {
    fetcher: ResourceFetcher<S>,
    generations: GenerationCounter,
}

impl<S: ContentSource> ScanPipeline<S> {
    #[must_use]
    pub fn new(source: S, options: FetchOptions) -> Self {
        Self {
            fetcher: ResourceFetcher::new(source, options),
            generations: GenerationCounter::new(),
        }
    }

    #[must_use]
    pub const fn generations(&self) -> &GenerationCounter {
        &self.generations
    }

    #[must_use]
    pub const fn fetcher(&self) -> &ResourceFetcher<S> {
        &self.fetcher
    }

    /// Start a tagged run over `urls` with a snapshot of `patterns`.
    pub async fn run(&self, patterns: &[Pattern], urls: &[String]) -> RunOutcome {
        let generation = self.generations.begin();
        self.run_as(generation, patterns, urls).await
    }

    pub(crate) async fn run_as(
        &self,
        generation: Generation,
        patterns: &[Pattern],
        urls: &[String],
    ) -> RunOutcome {
        let report = self.execute(generation, patterns, urls).await;

        if self.generations.is_current(generation) {
            RunOutcome::Current(report)
        } else {
            let latest = self.generations.latest();
            warn!("Discarding results of scan {generation}, superseded by {latest}");
            RunOutcome::Stale { generation, latest }
        }
    }

    async fn execute(
        &self,
        generation: Generation,
        patterns: &[Pattern],
        urls: &[String],
    ) -> ScanReport {
        let started_at = Utc::now();
        info!(
            "Scan {generation} started: {} patterns over {} resources",
            patterns.len(),
            urls.len()
        );

        let fetched = self.fetcher.fetch_all(urls).await;
        let analysis = analyze(patterns, &fetched.resources);

        let mut diagnostics = fetched.diagnostics;
        diagnostics.extend(analysis.diagnostics);

        let report = ScanReport {
            generation,
            patterns: patterns.to_vec(),
            urls: urls.to_vec(),
            groups: analysis.groups,
            diagnostics,
            raw_matches: analysis.raw_matches,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Scan {generation} finished: {} groups, {} matches ({} raw), {} failed resources, {} invalid patterns",
            report.groups.len(),
            report.match_count(),
            report.raw_matches,
            report.failed_resources(),
            report.invalid_patterns()
        );

        report
    }
}
