//! Case-insensitive fuzzy matching shared by the filter, scorer, and
//! geographic distributor. A "match" is an either-direction substring hit,
//! so `fitness` matches `Fitness & Wellness` and vice versa.

/// Either-direction, case-insensitive substring match.
pub(crate) fn fuzzy_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// True if any entry of `haystack` fuzzy-matches `needle`.
pub(crate) fn matches_any(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|h| fuzzy_match(h, needle))
}

/// Number of entries in `categories` that fuzzy-match at least one `wanted`
/// entry. Each category counts at most once.
pub(crate) fn match_count(categories: &[String], wanted: &[String]) -> usize {
    categories
        .iter()
        .filter(|cat| wanted.iter().any(|w| fuzzy_match(cat, w)))
        .count()
}

/// True if the two lists share at least one fuzzy match.
pub(crate) fn any_overlap(left: &[String], right: &[String]) -> bool {
    left.iter().any(|l| matches_any(right, l))
}
