//! Builds the resource list for a page: the page itself, then every script
//! it references.

use async_trait::async_trait;
use regex::Regex;
use rxscan_core::{ContentSource, ResourceLocator};
use std::sync::OnceLock;
use tracing::{info, warn};
use url::Url;

/// Resource list given up front by the caller.
#[derive(Debug, Clone)]
pub struct StaticLocator {
    primary: String,
    references: Vec<String>,
}

impl StaticLocator {
    #[must_use]
    pub const fn new(primary: String, references: Vec<String>) -> Self {
        Self {
            primary,
            references,
        }
    }
}

#[async_trait]
impl ResourceLocator for StaticLocator {
    async fn primary_url(&self) -> anyhow::Result<String> {
        Ok(self.primary.clone())
    }

    async fn referenced_urls(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.references.clone())
    }
}

/// Discovers `<script src>` references by downloading the primary document.
///
/// `extra` URLs are appended after the discovered ones. The discovery body is
/// not reused: the fetcher downloads the primary document again for matching,
/// so a page that changes between the two requests may be scanned in a
/// different state than the one its script list came from.
pub struct HtmlScriptLocator<S> {
    primary: String,
    source: S,
    extra: Vec<String>,
}

impl<S: ContentSource> HtmlScriptLocator<S> {
    #[must_use]
    pub const fn new(primary: String, source: S) -> Self {
        Self {
            primary,
            source,
            extra: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }
}

#[async_trait]
impl<S: ContentSource> ResourceLocator for HtmlScriptLocator<S> {
    async fn primary_url(&self) -> anyhow::Result<String> {
        Ok(self.primary.clone())
    }

    async fn referenced_urls(&self) -> anyhow::Result<Vec<String>> {
        let mut urls = match self.source.fetch(&self.primary).await {
            Ok(html) => {
                let found = extract_script_urls(&self.primary, &html);
                info!("Discovered {} script references on {}", found.len(), self.primary);
                found
            }
            Err(e) => {
                warn!("Script discovery failed for {}: {e}", self.primary);
                Vec::new()
            }
        };
        urls.extend(self.extra.iter().cloned());
        Ok(urls)
    }
}

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn script_src_pattern() -> &'static Regex {
    static SCRIPT_SRC: OnceLock<Regex> = OnceLock::new();
    SCRIPT_SRC.get_or_init(|| {
        Regex::new(r#"(?is)<script\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Script `src` values in document order, resolved against `page_url`.
///
/// Empty and unresolvable references are skipped. Repeats are kept.
#[must_use]
pub fn extract_script_urls(page_url: &str, html: &str) -> Vec<String> {
    let base = Url::parse(page_url).ok();

    script_src_pattern()
        .captures_iter(html)
        .filter_map(|cap| {
            let raw = cap.get(1).or_else(|| cap.get(2)).or_else(|| cap.get(3))?;
            let raw = raw.as_str().trim();
            if raw.is_empty() {
                return None;
            }
            match &base {
                Some(base) => base.join(raw).ok().map(String::from),
                None => Url::parse(raw).ok().map(String::from),
            }
        })
        .collect()
}
