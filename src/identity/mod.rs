//! Author-identity consolidation.
//!
//! Version-control metadata records the same person under several raw
//! spellings ("John Smith", "john smith", "john.smith@co.com"). This
//! module groups equivalent spellings and rewrites records to a single
//! canonical form per group. The equivalence predicate is behind the
//! [`IdentityMatcher`] trait so stricter strategies can be swapped in
//! without touching aggregation.

mod heuristic;
mod union_find;

pub use heuristic::HeuristicMatcher;
pub use union_find::DisjointSet;

use crate::model::ChangeRecord;
use std::collections::HashMap;

/// Equivalence predicate over raw author identities.
pub trait IdentityMatcher {
    fn matches(&self, a: &str, b: &str) -> bool;
}

/// Mapping from every observed raw identity to the preferred spelling
/// of its equivalence class. Resolving an already-canonical member
/// returns it unchanged.
pub struct CanonicalMap {
    map: HashMap<String, String>,
}

impl CanonicalMap {
    /// Build the map from the distinct identities in `identities`.
    ///
    /// Identities related directly or transitively by the matcher end
    /// up in one group.
    pub fn build<'a, I>(identities: I, matcher: &dyn IdentityMatcher) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut distinct: Vec<&str> = identities.into_iter().collect();
        distinct.sort_unstable();
        distinct.dedup();

        let mut sets = DisjointSet::new(distinct.len());
        for i in 0..distinct.len() {
            for j in (i + 1)..distinct.len() {
                if matcher.matches(distinct[i], distinct[j]) {
                    sets.union(i, j);
                }
            }
        }

        let mut groups: HashMap<usize, Vec<&str>> = HashMap::new();
        for (i, identity) in distinct.iter().enumerate() {
            groups.entry(sets.find(i)).or_default().push(identity);
        }

        let mut map = HashMap::new();
        for members in groups.values() {
            let canonical = choose_canonical(members);
            for member in members {
                map.insert((*member).to_string(), canonical.to_string());
            }
        }

        Self { map }
    }

    /// Canonical spelling for `raw`; unknown identities resolve to
    /// themselves.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        self.map.get(raw).map(String::as_str).unwrap_or(raw)
    }

    /// Rewrite every record's author to its canonical form. Email,
    /// date, and file fields are left untouched.
    pub fn apply(&self, records: &mut [ChangeRecord]) {
        for record in records {
            let canonical = self.resolve(&record.author).to_string();
            record.author = canonical;
        }
    }
}

/// Pick the preferred spelling of a group: a formatted full name (one
/// containing whitespace) beats a collapsed one, and among formatted
/// names a plain name beats an email. Groups with no formatted member
/// fall back to the lexically smallest member.
fn choose_canonical<'a>(members: &[&'a str]) -> &'a str {
    let formatted: Vec<&str> = members
        .iter()
        .copied()
        .filter(|m| m.chars().any(char::is_whitespace))
        .collect();

    if formatted.is_empty() {
        members.iter().copied().min().unwrap_or("")
    } else {
        formatted
            .iter()
            .copied()
            .min_by_key(|m| (m.contains('@'), *m))
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn build(identities: &[&str]) -> CanonicalMap {
        CanonicalMap::build(identities.iter().copied(), &HeuristicMatcher)
    }

    #[test]
    fn case_and_whitespace_variants_collapse() {
        let map = build(&["John Smith", "john smith", "JOHNSMITH"]);
        assert_eq!(map.resolve("john smith"), "John Smith");
        assert_eq!(map.resolve("JOHNSMITH"), "John Smith");
        assert_eq!(map.resolve("John Smith"), "John Smith");
    }

    #[test]
    fn email_and_display_name_collapse() {
        let map = build(&["john.smith@co.com", "John Smith"]);
        assert_eq!(map.resolve("john.smith@co.com"), "John Smith");
    }

    #[test]
    fn unrelated_initial_email_stays_distinct() {
        let map = build(&["jsmith@co.com", "John Smith"]);
        assert_eq!(map.resolve("jsmith@co.com"), "jsmith@co.com");
        assert_eq!(map.resolve("John Smith"), "John Smith");
    }

    #[test]
    fn groups_join_transitively() {
        // "johnsmith" matches "John Smith" by collapse, and the email
        // matches "John Smith" by local-part: all three become one
        // group even though "johnsmith" and the email never match
        // directly.
        let map = build(&["johnsmith", "John Smith", "john.smith@co.com"]);
        assert_eq!(map.resolve("johnsmith"), "John Smith");
        assert_eq!(map.resolve("john.smith@co.com"), "John Smith");
    }

    #[test]
    fn formatted_name_without_at_sign_wins() {
        let map = build(&["John Smith", "john smith", "john.smith@co.com"]);
        // "John Smith" < "john smith" lexically and neither holds an @
        assert_eq!(map.resolve("john.smith@co.com"), "John Smith");
    }

    #[test]
    fn unformatted_group_resolves_to_lexical_minimum() {
        let map = build(&["zeta", "Zeta"]);
        assert_eq!(map.resolve("zeta"), "Zeta");
        assert_eq!(map.resolve("Zeta"), "Zeta");
    }

    #[test]
    fn resolve_is_idempotent() {
        let map = build(&["John Smith", "john.smith@co.com", "johnsmith"]);
        for raw in ["John Smith", "john.smith@co.com", "johnsmith"] {
            let once = map.resolve(raw);
            assert_eq!(map.resolve(once), once);
        }
    }

    #[test]
    fn unknown_identity_resolves_to_itself() {
        let map = build(&["John Smith"]);
        assert_eq!(map.resolve("Someone Else"), "Someone Else");
    }

    #[test]
    fn apply_rewrites_author_only() {
        let mut records = vec![ChangeRecord {
            folder: "Scripts".into(),
            author: "john smith".into(),
            email: "john.smith@co.com".into(),
            timestamp: Utc::now(),
            kind: crate::model::ChangeKind::Added,
            path: "Scripts/001_init.sql".into(),
            commit_id: "abc".into(),
            message: "init".into(),
        }];
        let map = build(&["john smith", "John Smith"]);
        map.apply(&mut records);
        assert_eq!(records[0].author, "John Smith");
        assert_eq!(records[0].email, "john.smith@co.com");
    }
}
