//! Trigger surface: initial load, pattern added, pattern removed.
//!
//! Each trigger takes a generation token first, then reads one snapshot of
//! the pattern list and the resource URLs, then runs the whole pipeline.

use tracing::info;

use crate::{
    ContentSource, FetchOptions, Pattern, PatternStore, ResourceLocator, RunOutcome, ScanPipeline,
};

pub struct ScanSession<P, L, S> {
    store: P,
    locator: L,
    pipeline: ScanPipeline<S>,
}

impl<P, L, S> ScanSession<P, L, S>
where
    P: PatternStore,
    L: ResourceLocator,
    S: ContentSource,
{
    #[must_use]
    pub fn new(store: P, locator: L, source: S, options: FetchOptions) -> Self {
        Self {
            store,
            locator,
            pipeline: ScanPipeline::new(source, options),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &P {
        &self.store
    }

    #[must_use]
    pub const fn pipeline(&self) -> &ScanPipeline<S> {
        &self.pipeline
    }

    /// Scan with the persisted pattern list as it stands.
    pub async fn refresh(&self) -> anyhow::Result<RunOutcome> {
        self.rescan().await
    }

    pub async fn add_pattern(&self, pattern: Pattern) -> anyhow::Result<RunOutcome> {
        info!("Adding pattern: {pattern}");
        self.store.append(pattern).await?;
        self.rescan().await
    }

    /// Remove the first entry equal to `pattern` and rescan. The flag reports
    /// whether anything was removed; the rescan happens either way.
    pub async fn remove_pattern(&self, pattern: &Pattern) -> anyhow::Result<(bool, RunOutcome)> {
        let removed = self.store.remove(pattern).await?;
        if removed {
            info!("Removed pattern: {pattern}");
        } else {
            info!("Pattern not found: {pattern}");
        }
        let outcome = self.rescan().await?;
        Ok((removed, outcome))
    }

    /// The ordered URL list: primary resource first, then references.
    pub async fn resource_urls(&self) -> anyhow::Result<Vec<String>> {
        let mut urls = vec![self.locator.primary_url().await?];
        urls.extend(self.locator.referenced_urls().await?);
        Ok(urls)
    }

    async fn rescan(&self) -> anyhow::Result<RunOutcome> {
        let generation = self.pipeline.generations().begin();
        let patterns = self.store.load().await?;
        let urls = self.resource_urls().await?;
        Ok(self.pipeline.run_as(generation, &patterns, &urls).await)
    }
}
