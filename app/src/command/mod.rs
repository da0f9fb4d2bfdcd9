//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`.

use async_trait::async_trait;
use rxscan_config::{Config, OutputFormat};
use rxscan_core::{ResourceLocator, RunOutcome, ScanSession};
use rxscan_fetch::{HtmlScriptLocator, HttpSource, StaticLocator};
use rxscan_store::JsonFilePatternStore;
use std::sync::Arc;
use tracing::{info, warn};

use crate::presenter::presenter_for;

mod info;
mod init;
mod list;
mod pattern;
mod scan;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use list::ListStrategy;
pub use pattern::{AddStrategy, PatternInput, RemoveStrategy};
pub use scan::{ScanInput, ScanStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// adding a command only requires implementing this trait.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Which page to scan and how to find its scripts.
#[derive(Debug, Clone)]
pub struct PageTarget {
    /// Primary document URL
    pub url: String,
    /// Extra script URLs scanned after discovered ones
    pub scripts: Vec<String>,
    /// Skip `<script src>` discovery on the primary document
    pub no_discover: bool,
}

/// Either a fixed URL list or discovery from the primary document.
pub enum PageLocator {
    Static(StaticLocator),
    Discover(HtmlScriptLocator<Arc<HttpSource>>),
}

#[async_trait]
impl ResourceLocator for PageLocator {
    async fn primary_url(&self) -> anyhow::Result<String> {
        match self {
            Self::Static(locator) => locator.primary_url().await,
            Self::Discover(locator) => locator.primary_url().await,
        }
    }

    async fn referenced_urls(&self) -> anyhow::Result<Vec<String>> {
        match self {
            Self::Static(locator) => locator.referenced_urls().await,
            Self::Discover(locator) => locator.referenced_urls().await,
        }
    }
}

pub type CliSession = ScanSession<JsonFilePatternStore, PageLocator, Arc<HttpSource>>;

/// Shared setup: config, pattern store, HTTP source, locator.
pub fn build_session(config: &Config, target: PageTarget) -> anyhow::Result<CliSession> {
    let store = JsonFilePatternStore::new(config.patterns_path()?);
    let http = Arc::new(HttpSource::new(config.fetch.http.clone())?);

    let locator = if target.no_discover {
        PageLocator::Static(StaticLocator::new(target.url, target.scripts))
    } else {
        PageLocator::Discover(
            HtmlScriptLocator::new(target.url, http.clone()).with_extra(target.scripts),
        )
    };

    info!("Patterns file: {}", store.path().display());
    Ok(ScanSession::new(
        store,
        locator,
        http,
        config.fetch.fetch_options(),
    ))
}

/// Pick the output format: `--json` wins over config.
#[must_use]
pub fn output_format(config: &Config, json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        config.output.format
    }
}

/// Render the outcome of a run, unless a newer run superseded it.
pub fn print_outcome(outcome: RunOutcome, format: OutputFormat) -> anyhow::Result<()> {
    let report = match outcome {
        RunOutcome::Current(report) => report,
        RunOutcome::Stale { generation, latest } => {
            warn!("Scan {generation} was superseded by {latest}; nothing to show");
            return Ok(());
        }
    };
    let rendered = presenter_for(format).render(&report.patterns, &report)?;
    print!("{rendered}");
    Ok(())
}
