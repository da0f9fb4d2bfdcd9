use rxscan_config::Config;
use rxscan_core::{Pattern, PatternStore};
use rxscan_store::JsonFilePatternStore;

use super::{PageTarget, build_session, output_format, print_outcome};
use crate::presenter::TextPresenter;

/// Input parameters for the Add and Remove command strategies.
#[derive(Debug, Clone)]
pub struct PatternInput {
    pub pattern: String,
    /// Page to rescan after the change; without one only the list is updated
    pub target: Option<PageTarget>,
    pub json: bool,
}

/// Strategy for appending a pattern to the saved list.
///
/// Patterns are stored verbatim; an invalid regex is only reported when a
/// scan tries to compile it.
#[derive(Debug, Clone, Copy)]
pub struct AddStrategy;

impl super::CommandStrategy for AddStrategy {
    type Input = PatternInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let pattern = Pattern::from(input.pattern);

        if let Some(target) = input.target {
            let format = output_format(&config, input.json);
            let session = build_session(&config, target)?;
            let outcome = session.add_pattern(pattern).await?;
            return print_outcome(outcome, format);
        }

        let store = JsonFilePatternStore::new(config.patterns_path()?);
        store.append(pattern).await?;
        print!("{}", TextPresenter::render_patterns(&store.load().await?));
        Ok(())
    }
}

/// Strategy for removing one entry from the saved list.
///
/// Only the first exact match is removed; remaining duplicates stay.
#[derive(Debug, Clone, Copy)]
pub struct RemoveStrategy;

impl super::CommandStrategy for RemoveStrategy {
    type Input = PatternInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let pattern = Pattern::from(input.pattern);

        if let Some(target) = input.target {
            let format = output_format(&config, input.json);
            let session = build_session(&config, target)?;
            let (removed, outcome) = session.remove_pattern(&pattern).await?;
            if !removed {
                eprintln!("Pattern not found: {pattern}");
            }
            return print_outcome(outcome, format);
        }

        let store = JsonFilePatternStore::new(config.patterns_path()?);
        if !store.remove(&pattern).await? {
            anyhow::bail!("Pattern not found: {pattern}");
        }
        print!("{}", TextPresenter::render_patterns(&store.load().await?));
        Ok(())
    }
}
