use rxscan_core::FetchOptions;
use rxscan_fetch::HttpSourceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FetchConfig {
    #[serde(flatten)]
    pub http: HttpSourceConfig,
    #[serde(default = "FetchConfig::default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            http: HttpSourceConfig::default(),
            max_concurrency: Self::default_max_concurrency(),
        }
    }
}

impl FetchConfig {
    const fn default_max_concurrency() -> usize {
        8
    }

    /// Per-resource limits for the fan-out. The timeout bounds a retrieval
    /// including its retries.
    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        let retry_budget = self
            .http
            .retry_delays_ms
            .iter()
            .copied()
            .fold(0u64, u64::saturating_add);
        let attempts = u32::try_from(self.http.retry_delays_ms.len().saturating_add(1))
            .unwrap_or(u32::MAX);
        FetchOptions {
            timeout: self
                .http
                .timeout()
                .saturating_mul(attempts)
                .saturating_add(std::time::Duration::from_millis(retry_budget)),
            max_concurrency: self.max_concurrency,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const CONFIG_TEMPLATE: &str = r#"{
  "fetch": {
    "timeout_secs": 10,
    "user_agent": "Mozilla/5.0 (compatible; rxscan/1.0)",
    "max_size": 5000000,
    "max_concurrency": 8,
    "require_success_status": false,
    "retry_delays_ms": []
  },
  "store": {},
  "output": {
    "format": "text"
  }
}"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("rxscan"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'rxscan init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    /// Like [`Config::load`], but a missing file means built-in defaults.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!(
                "No config at {}, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Where the pattern list lives: configured path, else `~/rxscan/patterns.json`.
    pub fn patterns_path(&self) -> anyhow::Result<PathBuf> {
        match &self.store.patterns_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("patterns.json")),
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");
        Self::create_config_at(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Add a pattern: rxscan add 'api[_-]?key'");
        println!("   2. Scan a page:   rxscan scan https://example.com/");
        println!();
        println!("🔧 Configuration options:");
        println!("   - fetch.timeout_secs: per-resource timeout");
        println!("   - fetch.require_success_status: skip error pages instead of scanning them");
        println!("   - fetch.retry_delays_ms: backoff schedule for transient failures");
        println!("   - store.patterns_path: where the pattern list is kept");
        println!("   - output.format: text or json");
        println!();
        Ok(())
    }

    pub fn create_config_at(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(config_path, CONFIG_TEMPLATE)?;
        Ok(())
    }
}
