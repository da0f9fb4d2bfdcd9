use rxscan_config::Config;
use rxscan_core::PatternStore;
use rxscan_store::JsonFilePatternStore;

use crate::presenter::TextPresenter;

/// Strategy for printing the saved pattern list in evaluation order.
#[derive(Debug, Clone, Copy)]
pub struct ListStrategy;

impl super::CommandStrategy for ListStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let store = JsonFilePatternStore::new(config.patterns_path()?);
        print!("{}", TextPresenter::render_patterns(&store.load().await?));
        Ok(())
    }
}
