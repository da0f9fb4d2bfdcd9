use rxscan_config::Config;

use super::{PageTarget, build_session, output_format, print_outcome};

/// Input parameters for the Scan command strategy.
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub target: PageTarget,
    /// Emit JSON regardless of configured format
    pub json: bool,
}

/// Strategy for scanning a page with the saved pattern list.
///
/// This is the initial-load trigger: the persisted patterns are read once and
/// the full pipeline runs over the page and its scripts.
#[derive(Debug, Clone, Copy)]
pub struct ScanStrategy;

impl super::CommandStrategy for ScanStrategy {
    type Input = ScanInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let format = output_format(&config, input.json);
        let session = build_session(&config, input.target)?;

        let outcome = session.refresh().await?;
        print_outcome(outcome, format)
    }
}
