//! Concurrent retrieval of resource contents.
//!
//! Every URL is fetched independently. Failures are recorded as absent
//! content plus a diagnostic; they never cancel sibling retrievals. The
//! caller gets nothing until every retrieval has settled, and results are
//! reassembled in input order regardless of completion order.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{Diagnostic, Resource, RetrievalError};

/// Retrieves the text behind one URL.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, RetrievalError>;
}

#[async_trait]
impl<T: ContentSource + ?Sized> ContentSource for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, RetrievalError> {
        (**self).fetch(url).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Applied to each retrieval; exceeding it counts as a failure.
    pub timeout: Duration,
    /// Number of retrievals in flight at once.
    pub max_concurrency: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_concurrency: 8,
        }
    }
}

/// Settled retrievals, same length and order as the requested URLs.
#[derive(Debug, Clone, Default)]
pub struct FetchOutput {
    pub resources: Vec<Resource>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ResourceFetcher<S> {
    source: S,
    options: FetchOptions,
}

impl<S: ContentSource> ResourceFetcher<S> {
    #[must_use]
    pub const fn new(source: S, options: FetchOptions) -> Self {
        Self { source, options }
    }

    #[must_use]
    pub const fn options(&self) -> &FetchOptions {
        &self.options
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch_all(&self, urls: &[String]) -> FetchOutput {
        // `buffered` yields in submission order, so slot i always holds urls[i].
        let settled: Vec<Result<String, RetrievalError>> = stream::iter(urls)
            .map(|url| self.fetch_one(url))
            .buffered(self.options.max_concurrency.max(1))
            .collect()
            .await;

        let mut output = FetchOutput {
            resources: Vec::with_capacity(urls.len()),
            diagnostics: Vec::new(),
        };

        for (url, result) in urls.iter().zip(settled) {
            match result {
                Ok(content) => {
                    debug!(url = %url, bytes = content.len(), "Fetched resource");
                    output.resources.push(Resource::loaded(url.clone(), content));
                }
                Err(e) => {
                    warn!(url = %url, "Failed to fetch resource: {e}");
                    output.diagnostics.push(Diagnostic::retrieval(url.clone(), &e));
                    output.resources.push(Resource::absent(url.clone()));
                }
            }
        }

        output
    }

    async fn fetch_one(&self, url: &str) -> Result<String, RetrievalError> {
        match tokio::time::timeout(self.options.timeout, self.source.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(RetrievalError::Timeout(self.options.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bodies, optionally after a delay, and records call order.
    struct CannedSource {
        bodies: HashMap<String, (u64, Result<String, RetrievalError>)>,
        completed: Mutex<Vec<String>>,
    }

    impl CannedSource {
        fn new(entries: &[(&str, u64, Result<&str, RetrievalError>)]) -> Self {
            let bodies = entries
                .iter()
                .map(|(url, delay, body)| {
                    (
                        (*url).to_string(),
                        (*delay, body.clone().map(str::to_string)),
                    )
                })
                .collect();
            Self {
                bodies,
                completed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ContentSource for CannedSource {
        async fn fetch(&self, url: &str) -> Result<String, RetrievalError> {
            let Some((delay, body)) = self.bodies.get(url) else {
                return Err(RetrievalError::Transport(format!("no route to {url}")));
            };
            tokio::time::sleep(Duration::from_millis(*delay)).await;
            self.completed.lock().unwrap().push(url.to_string());
            body.clone()
        }
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn preserves_input_order_when_completion_order_differs() {
        let source = CannedSource::new(&[
            ("slow", 60, Ok("first")),
            ("medium", 30, Ok("second")),
            ("fast", 0, Ok("third")),
        ]);
        let fetcher = ResourceFetcher::new(source, FetchOptions::default());

        let output = fetcher.fetch_all(&urls(&["slow", "medium", "fast"])).await;

        let got: Vec<_> = output
            .resources
            .iter()
            .map(|r| (r.url.as_str(), r.content.as_deref()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("slow", Some("first")),
                ("medium", Some("second")),
                ("fast", Some("third")),
            ]
        );
        let completed = fetcher.source().completed.lock().unwrap().clone();
        assert_eq!(completed.first().map(String::as_str), Some("fast"));
        assert!(output.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn failure_is_isolated_to_its_slot() {
        let source = CannedSource::new(&[
            ("a", 0, Ok("alpha")),
            ("b", 0, Err(RetrievalError::Status(503))),
            ("c", 0, Ok("gamma")),
        ]);
        let fetcher = ResourceFetcher::new(source, FetchOptions::default());

        let output = fetcher.fetch_all(&urls(&["a", "b", "c"])).await;

        assert_eq!(output.resources.len(), 3);
        assert_eq!(output.resources[0].content.as_deref(), Some("alpha"));
        assert!(output.resources[1].is_absent());
        assert_eq!(output.resources[2].content.as_deref(), Some("gamma"));
        assert_eq!(
            output.diagnostics,
            vec![Diagnostic::RetrievalFailure {
                url: "b".into(),
                reason: "HTTP status 503".into(),
            }]
        );
    }

    #[tokio::test]
    async fn slow_retrieval_times_out_as_absent() {
        let source = CannedSource::new(&[("quick", 0, Ok("ok")), ("stuck", 5_000, Ok("late"))]);
        let fetcher = ResourceFetcher::new(
            source,
            FetchOptions {
                timeout: Duration::from_millis(50),
                max_concurrency: 4,
            },
        );

        let output = fetcher.fetch_all(&urls(&["quick", "stuck"])).await;

        assert_eq!(output.resources[0].content.as_deref(), Some("ok"));
        assert!(output.resources[1].is_absent());
        assert!(matches!(
            &output.diagnostics[..],
            [Diagnostic::RetrievalFailure { url, reason }] if url == "stuck" && reason.contains("timed out")
        ));
    }

    #[tokio::test]
    async fn zero_concurrency_still_makes_progress() {
        let source = CannedSource::new(&[("a", 0, Ok("x")), ("b", 0, Ok("y"))]);
        let fetcher = ResourceFetcher::new(
            source,
            FetchOptions {
                timeout: Duration::from_secs(1),
                max_concurrency: 0,
            },
        );

        let output = fetcher.fetch_all(&urls(&["a", "b"])).await;
        assert_eq!(output.resources.len(), 2);
        assert!(output.resources.iter().all(|r| !r.is_absent()));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let fetcher = ResourceFetcher::new(CannedSource::new(&[]), FetchOptions::default());
        let output = fetcher.fetch_all(&[]).await;
        assert!(output.resources.is_empty());
        assert!(output.diagnostics.is_empty());
    }
}
