//! Applies the ordered pattern list to the ordered resource list.
//!
//! Evaluation is pattern-major, resource-minor. Every pattern is compiled
//! case-insensitively and scanned for all non-overlapping occurrences, left
//! to right. A pattern that fails to compile contributes nothing and is
//! reported once; the remaining patterns still run.
//!
//! The dialect includes look-around and backreferences. Patterns that need
//! backtracking can fail while matching (backtrack limit); that stops the
//! pattern on the resource where it happened and is reported per URL.

use fancy_regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::warn;

use crate::{Diagnostic, MatchRecord, Pattern, PatternError, Resource};

#[derive(Debug, Clone, Default)]
pub struct MatchOutput {
    pub records: Vec<MatchRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile a user-supplied pattern for scanning.
pub fn compile_pattern(pattern: &Pattern) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern.as_str())
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError {
            pattern: pattern.clone(),
            source,
        })
}

#[must_use]
pub fn match_patterns(patterns: &[Pattern], resources: &[Resource]) -> MatchOutput {
    let mut output = MatchOutput::default();
    // Duplicate patterns share one compilation and one diagnostic.
    let mut compiled: HashMap<&str, Option<Regex>> = HashMap::new();

    for pattern in patterns {
        let regex = compiled.entry(pattern.as_str()).or_insert_with(|| {
            match compile_pattern(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Skipping pattern: {e}");
                    output.diagnostics.push(Diagnostic::pattern(&e));
                    None
                }
            }
        });
        let Some(regex) = regex.as_ref() else {
            continue;
        };

        for resource in resources {
            let Some(content) = resource.content.as_deref() else {
                continue;
            };
            for found in regex.find_iter(content) {
                match found {
                    Ok(m) => output.records.push(MatchRecord::new(
                        pattern.clone(),
                        resource.url.clone(),
                        m.as_str(),
                    )),
                    Err(source) => {
                        let error = PatternError {
                            pattern: pattern.clone(),
                            source,
                        };
                        warn!("Stopped matching on {}: {error}", resource.url);
                        output
                            .diagnostics
                            .push(Diagnostic::pattern_match(&resource.url, &error));
                        break;
                    }
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(records: &[MatchRecord]) -> Vec<&str> {
        records.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn matching_ignores_case() {
        let resources = [Resource::loaded("page", "FOO Foo fOO foo")];
        let output = match_patterns(&[Pattern::from("foo")], &resources);
        assert_eq!(texts(&output.records), vec!["FOO", "Foo", "fOO", "foo"]);
    }

    #[test]
    fn evaluation_is_pattern_major() {
        let resources = [
            Resource::loaded("a", "cat dog"),
            Resource::loaded("b", "dog cat"),
        ];
        let patterns = [Pattern::from("dog"), Pattern::from("cat")];

        let output = match_patterns(&patterns, &resources);

        let got: Vec<_> = output
            .records
            .iter()
            .map(|r| (r.pattern.as_str(), r.url.as_str()))
            .collect();
        assert_eq!(got, vec![("dog", "a"), ("dog", "b"), ("cat", "a"), ("cat", "b")]);
    }

    #[test]
    fn absent_content_is_skipped_silently() {
        let resources = [Resource::absent("gone"), Resource::loaded("here", "xx")];
        let output = match_patterns(&[Pattern::from("x")], &resources);
        assert_eq!(output.records.len(), 2);
        assert!(output.records.iter().all(|r| r.url == "here"));
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn invalid_pattern_is_isolated() {
        let resources = [Resource::loaded("page", "foo")];
        let patterns = [Pattern::from("("), Pattern::from("foo")];

        let output = match_patterns(&patterns, &resources);

        assert_eq!(output.records, vec![MatchRecord::new(Pattern::from("foo"), "page", "foo")]);
        assert!(matches!(
            &output.diagnostics[..],
            [Diagnostic::PatternCompileFailure { pattern, .. }] if pattern.as_str() == "("
        ));
    }

    #[test]
    fn look_around_and_backreferences_are_supported() {
        let resources = [Resource::loaded("page", "key=SECRET aa")];
        let patterns = [Pattern::from(r"(?<=key=)\w+"), Pattern::from(r"(a)\1")];

        let output = match_patterns(&patterns, &resources);

        assert_eq!(texts(&output.records), vec!["SECRET", "aa"]);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn backreference_ignores_case() {
        let resources = [Resource::loaded("page", "Aa bB cd")];
        let output = match_patterns(&[Pattern::from(r"(\w)\1")], &resources);
        assert_eq!(texts(&output.records), vec!["Aa", "bB"]);
    }

    #[test]
    fn lookahead_limits_match_text() {
        let resources = [Resource::loaded("page", "token: abc123 tokenless")];
        let output = match_patterns(&[Pattern::from(r"token(?=:)")], &resources);
        assert_eq!(texts(&output.records), vec!["token"]);
    }

    #[test]
    fn duplicate_invalid_pattern_reported_once() {
        let patterns = [Pattern::from("["), Pattern::from("[")];
        let output = match_patterns(&patterns, &[Resource::loaded("p", "[")]);
        assert!(output.records.is_empty());
        assert_eq!(output.diagnostics.len(), 1);
    }

    #[test]
    fn occurrences_are_non_overlapping_left_to_right() {
        let resources = [Resource::loaded("p", "aaaa")];
        let output = match_patterns(&[Pattern::from("aa")], &resources);
        assert_eq!(texts(&output.records), vec!["aa", "aa"]);
    }

    #[test]
    fn identical_inputs_give_identical_order() {
        let resources = [
            Resource::loaded("u1", "token=abc; TOKEN=def"),
            Resource::loaded("u2", "secret token"),
        ];
        let patterns = [Pattern::from(r"token=\w+"), Pattern::from("token")];
        let first = match_patterns(&patterns, &resources);
        let second = match_patterns(&patterns, &resources);
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn empty_pattern_list_yields_nothing() {
        let output = match_patterns(&[], &[Resource::loaded("p", "anything")]);
        assert!(output.records.is_empty());
        assert!(output.diagnostics.is_empty());
    }
}
