#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod http;
pub mod locator;
pub mod retry;

pub use http::{HttpSource, HttpSourceConfig};
pub use locator::{HtmlScriptLocator, StaticLocator, extract_script_urls};
pub use retry::retry_with_backoff;
