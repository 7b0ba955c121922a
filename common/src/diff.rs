use std::collections::{HashMap, HashSet};

use similar::{ChangeTag, TextDiff};

use api::diff::{PairChange, PairDiff};

use crate::parse::parse_pairs;

const CONTEXT_RADIUS: usize = 3;

// unified diff of two texts, or an empty string when they match line for line
pub fn diff_text(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);

    if diff.ops().iter().all(|op| op.tag() == similar::DiffTag::Equal) {
        return String::new();
    }

    let mut out = String::from("--- original\n+++ modified\n");

    for hunk in diff.unified_diff().context_radius(CONTEXT_RADIUS).iter_hunks() {
        out += &format!("{}\n", hunk.header());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };

            out += sign;
            out += change.value();
            if change.missing_newline() {
                out += "\n";
            }
        }
    }

    out
}

// compare the variables rather than the lines, so reordering is not a change
//
// names are matched on their first occurrence; added and changed entries follow the
// modified order, removed entries the original order
pub fn diff_pairs(original: &str, modified: &str) -> PairDiff {
    let before = parse_pairs(original);
    let after = parse_pairs(modified);

    let mut old_values: HashMap<&str, &str> = HashMap::new();
    for pair in &before {
        old_values.entry(&pair.name).or_insert(&pair.value);
    }

    let new_names: HashSet<&str> = after.iter().map(|p| p.name.as_str()).collect();

    let mut diff = PairDiff::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for pair in &after {
        if !seen.insert(&pair.name) {
            continue;
        }

        match old_values.get(pair.name.as_str()) {
            None => diff.added.push(pair.clone()),
            Some(&old) if old != pair.value => diff.changed.push(PairChange {
                name: pair.name.clone(),
                old: old.to_string(),
                new: pair.value.clone(),
            }),
            Some(_) => {}
        }
    }

    seen.clear();

    for pair in &before {
        if seen.insert(&pair.name) && !new_names.contains(pair.name.as_str()) {
            diff.removed.push(pair.clone());
        }
    }

    diff
}
