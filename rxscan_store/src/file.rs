use async_trait::async_trait;
use rxscan_core::{Pattern, PatternStore};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{Result, StoreError};

/// Pattern list persisted as a JSON array of strings.
///
/// A missing file reads as an empty list. Writes go through a sibling
/// temporary file and a rename so a crash never leaves half a list behind.
pub struct JsonFilePatternStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePatternStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<Pattern>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No pattern file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, patterns: &[Pattern]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let json = serde_json::to_string_pretty(patterns).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        debug!("Saved {} patterns to {}", patterns.len(), self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl PatternStore for JsonFilePatternStore {
    async fn load(&self) -> anyhow::Result<Vec<Pattern>> {
        Ok(self.read().await?)
    }

    async fn append(&self, pattern: Pattern) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut patterns = self.read().await?;
        info!("Saving pattern: {pattern}");
        patterns.push(pattern);
        self.write(&patterns).await?;
        Ok(())
    }

    async fn remove(&self, pattern: &Pattern) -> anyhow::Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut patterns = self.read().await?;
        if !crate::remove_first(&mut patterns, pattern) {
            return Ok(false);
        }
        self.write(&patterns).await?;
        Ok(true)
    }
}
