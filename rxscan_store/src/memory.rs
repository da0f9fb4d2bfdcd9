use async_trait::async_trait;
use rxscan_core::{Pattern, PatternStore};
use tokio::sync::RwLock;

/// Pattern list that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryPatternStore {
    patterns: RwLock<Vec<Pattern>>,
}

impl MemoryPatternStore {
    #[must_use]
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self {
            patterns: RwLock::new(patterns),
        }
    }
}

#[async_trait]
impl PatternStore for MemoryPatternStore {
    async fn load(&self) -> anyhow::Result<Vec<Pattern>> {
        Ok(self.patterns.read().await.clone())
    }

    async fn append(&self, pattern: Pattern) -> anyhow::Result<()> {
        self.patterns.write().await.push(pattern);
        Ok(())
    }

    async fn remove(&self, pattern: &Pattern) -> anyhow::Result<bool> {
        Ok(crate::remove_first(&mut *self.patterns.write().await, pattern))
    }
}
