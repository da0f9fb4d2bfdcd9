//! Folds the deduplicated record sequence into display groups.
//!
//! Records arrive pattern-major and resource-minor, so each `(pattern, url)`
//! pair is already contiguous and one adjacency pass is enough.

use crate::{Group, MatchRecord};

#[must_use]
pub fn group_records(records: Vec<MatchRecord>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    for record in records {
        if let Some(current) = groups
            .last_mut()
            .filter(|g| g.pattern == record.pattern && g.url == record.url)
        {
            current.matches.push(record.text);
            continue;
        }
        groups.push(Group {
            pattern: record.pattern,
            url: record.url,
            matches: vec![record.text],
        });
    }

    groups
}
