use std::cmp::Ordering;

use api::text::{Pair, SortKey};

// approximates the default collation browsers use for localeCompare: letters compare
// case-insensitively first, then lowercase sorts before uppercase, and only then do
// raw code points break the tie
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let case = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();

    fold(a)
        .cmp(&fold(b))
        .then_with(|| case(a).cmp(&case(b)))
        .then_with(|| a.cmp(b))
}

// stable, so pairs that compare equal keep their input order
pub fn sort_pairs(pairs: &mut [Pair], by: SortKey) {
    pairs.sort_by(|a, b| match by {
        SortKey::Key => locale_cmp(&a.name, &b.name),
        SortKey::Value => locale_cmp(&a.value, &b.value),
    });
}
