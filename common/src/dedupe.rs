use std::collections::HashMap;

use api::text::Pair;

// replace every repeated value with the name of the first variable that held it,
// returning the rewritten pairs and the number of duplicates replaced
pub fn dedupe(pairs: &[Pair]) -> (Vec<Pair>, usize) {
    let mut first_key: HashMap<&str, &str> = HashMap::new();
    let mut duplicates = 0;

    let output = pairs
        .iter()
        .map(|pair| match first_key.get(pair.value.as_str()) {
            Some(&key) => {
                duplicates += 1;
                Pair::new(pair.name.as_str(), key)
            }
            None => {
                first_key.insert(&pair.value, &pair.name);
                pair.clone()
            }
        })
        .collect();

    (output, duplicates)
}

// the inverse of dedupe: a value that names an earlier, unsubstituted variable is
// replaced by that variable's value.  keys are remembered on first sight only, and an
// input that legitimately used a variable name as a value cannot be told apart from a
// deduplicated one
pub fn reverse_dedupe(pairs: &[Pair]) -> (Vec<Pair>, usize) {
    let mut first_value: HashMap<&str, &str> = HashMap::new();
    let mut replacements = 0;

    let output = pairs
        .iter()
        .map(|pair| match first_value.get(pair.value.as_str()) {
            Some(&value) => {
                replacements += 1;
                Pair::new(pair.name.as_str(), value)
            }
            None => {
                first_value.entry(&pair.name).or_insert(&pair.value);
                pair.clone()
            }
        })
        .collect();

    (output, replacements)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse::{format_pairs, parse_pairs};

    #[test]
    fn repeated_values_point_at_the_first_key() {
        let (output, duplicates) = dedupe(&parse_pairs("a: red\nb: red\nc: blue"));

        assert_eq!(format_pairs(&output), "a: red\nb: a\nc: blue");
        assert_eq!(duplicates, 1);
    }

    #[test]
    fn reverse_restores_values_for_unique_keys() {
        let input = parse_pairs("bg: #fff\ncard: #fff\ntext: #000\nborder: #000\nlink: #00f\nfocus: #fff");

        let (deduped, duplicates) = dedupe(&input);
        let (restored, replacements) = reverse_dedupe(&deduped);

        assert_eq!(duplicates, 3);
        assert_eq!(replacements, 3);
        assert_eq!(restored, input);
    }

    #[test]
    fn reverse_keeps_the_first_value_of_a_repeated_key() {
        let (output, replacements) = reverse_dedupe(&parse_pairs("a: red\na: blue\nb: a"));

        assert_eq!(format_pairs(&output), "a: red\na: blue\nb: red");
        assert_eq!(replacements, 1);
    }

    #[test]
    fn nothing_to_do_on_distinct_values() {
        let input = parse_pairs("a: 1\nb: 2");

        assert_eq!(dedupe(&input), (input.clone(), 0));
        assert_eq!(reverse_dedupe(&input), (input, 0));
    }
}
