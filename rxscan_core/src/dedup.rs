//! Order-preserving removal of repeated `(pattern, url, text)` triples.

use std::collections::HashSet;

use crate::MatchRecord;

/// Keep the first record of every `(pattern, url, text)` triple, in input order.
#[must_use]
pub fn dedup_records(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert((r.pattern.clone(), r.url.clone(), r.text.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pattern;

    fn rec(pattern: &str, url: &str, text: &str) -> MatchRecord {
        MatchRecord::new(Pattern::from(pattern), url, text)
    }

    #[test]
    fn keeps_first_occurrence_in_order() {
        let input = vec![
            rec("p", "u", "b"),
            rec("p", "u", "a"),
            rec("p", "u", "b"),
            rec("q", "u", "b"),
            rec("p", "v", "b"),
            rec("p", "u", "a"),
        ];

        let out = dedup_records(input);

        assert_eq!(
            out,
            vec![
                rec("p", "u", "b"),
                rec("p", "u", "a"),
                rec("q", "u", "b"),
                rec("p", "v", "b"),
            ]
        );
    }

    #[test]
    fn is_idempotent() {
        let input = vec![
            rec("x", "1", "k"),
            rec("x", "1", "k"),
            rec("x", "2", "k"),
            rec("y", "1", "K"),
        ];
        let once = dedup_records(input);
        let twice = dedup_records(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn survivors_are_unique_and_cover_every_dropped_triple() {
        let input = vec![
            rec("a", "u", "1"),
            rec("a", "u", "2"),
            rec("a", "u", "1"),
            rec("b", "u", "1"),
            rec("a", "u", "2"),
        ];
        let out = dedup_records(input.clone());

        let unique: HashSet<_> = out.iter().collect();
        assert_eq!(unique.len(), out.len());
        for record in &input {
            assert!(out.contains(record));
        }
    }

    #[test]
    fn case_variants_are_distinct() {
        let out = dedup_records(vec![rec("t", "p", "token"), rec("t", "p", "TOKEN")]);
        assert_eq!(out.len(), 2);
    }
}
