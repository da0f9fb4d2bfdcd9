use rxscan_config::{Config, OutputFormat};
use rxscan_core::PatternStore;
use rxscan_store::JsonFilePatternStore;
use tracing::info;

/// Strategy for displaying configuration information.
///
/// This strategy outputs:
/// - Where the config and pattern files live
/// - Fetch limits (timeout, size, concurrency, retries)
/// - Output format
/// - Number of saved patterns
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        let config = Config::load_or_default()?;

        println!("=== rxscan Configuration ===\n");

        println!("Files:");
        if config_path.exists() {
            println!("  Config: {}", config_path.display());
        } else {
            println!("  Config: {} (not created, using defaults)", config_path.display());
        }
        let patterns_path = config.patterns_path()?;
        println!("  Patterns: {}", patterns_path.display());
        println!();

        println!("Fetch:");
        let http = &config.fetch.http;
        println!("  Timeout: {}s", http.timeout_secs);
        println!("  User-Agent: {}", truncate(&http.user_agent, 60));
        println!("  Max Size: {} bytes", http.max_size);
        println!("  Max Concurrency: {}", config.fetch.max_concurrency);
        println!("  Require Success Status: {}", http.require_success_status);
        if http.retry_delays_ms.is_empty() {
            println!("  Retries: none");
        } else {
            println!("  Retries: {:?} ms", http.retry_delays_ms);
        }
        println!();

        println!("Output:");
        println!("  Format: {}", format_output(config.output.format));
        println!();

        info!("Reading pattern list");
        let store = JsonFilePatternStore::new(patterns_path);
        match store.load().await {
            Ok(patterns) => println!("Saved Patterns: {}", patterns.len()),
            Err(e) => {
                println!("Saved Patterns: unreadable");
                println!("  Error: {e}");
            }
        }

        Ok(())
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

const fn format_output(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
    }
}
