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

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::JsonFilePatternStore;
pub use memory::MemoryPatternStore;

use rxscan_core::Pattern;

/// Remove the first entry equal to `pattern`, leaving any later duplicates.
pub(crate) fn remove_first(patterns: &mut Vec<Pattern>, pattern: &Pattern) -> bool {
    patterns
        .iter()
        .position(|p| p == pattern)
        .map(|index| patterns.remove(index))
        .is_some()
}
