use super::IdentityMatcher;

/// Default identity-matching heuristic.
///
/// Two identities denote the same author when either:
/// 1. they are equal after lower-casing and removing all whitespace, or
/// 2. one is an email whose local part is `first.last` and the other is
///    a display name whose first and last tokens are `first` and `last`.
///
/// Rule 1 is deliberately aggressive: distinct people whose collapsed
/// names collide will be merged. That matches the upstream audit
/// behavior and is accepted.
pub struct HeuristicMatcher;

impl IdentityMatcher for HeuristicMatcher {
    fn matches(&self, a: &str, b: &str) -> bool {
        collapsed(a) == collapsed(b) || email_matches_name(a, b) || email_matches_name(b, a)
    }
}

fn collapsed(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when `email` has a `first.last@domain` local part and `name`'s
/// first and last whitespace-separated tokens equal `first`/`last`
/// case-insensitively.
fn email_matches_name(email: &str, name: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.is_empty() {
        return false;
    }
    let mut parts = local.split('.');
    let (first, last) = match (parts.next(), parts.next(), parts.next()) {
        (Some(f), Some(l), None) if !f.is_empty() && !l.is_empty() => (f, l),
        _ => return false,
    };

    let tokens: Vec<&str> = name.split_whitespace().collect();
    let (Some(first_token), Some(last_token)) = (tokens.first(), tokens.last()) else {
        return false;
    };

    first_token.to_lowercase() == first.to_lowercase()
        && last_token.to_lowercase() == last.to_lowercase()
}
