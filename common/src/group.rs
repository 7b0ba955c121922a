use std::collections::HashSet;

use tracing::debug;

use api::text::Pair;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrefixGroup {
    pub prefix: String,
    pub members: Vec<Pair>,
}

pub fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map(|((i, x), _)| i + x.len_utf8())
        .unwrap_or(0);

    &a[..len]
}

// partition pairs by shared name prefix
//
// each pair joins the first existing group whose prefix it starts with.  otherwise its
// longest common prefix with any other name (first one wins on ties) becomes a new
// group, falling back to the whole name when nothing else shares a leading character.
// prefixes are unique, and a pair whose new prefix is already taken is dropped (since
// existing groups are tried first, any such pair would already have matched one).
//
// this is quadratic in the number of pairs, which is fine for hand-written lists
pub fn group_pairs(pairs: &[Pair]) -> Vec<PrefixGroup> {
    let mut groups: Vec<PrefixGroup> = Vec::new();
    let mut used: HashSet<String> = HashSet::new();

    for pair in pairs {
        if let Some(group) = groups
            .iter_mut()
            .find(|g| pair.name.starts_with(g.prefix.as_str()))
        {
            group.members.push(pair.clone());
            continue;
        }

        let mut prefix = "";
        for other in pairs.iter().filter(|p| p.name != pair.name) {
            let candidate = common_prefix(&pair.name, &other.name);
            if candidate.len() > prefix.len() {
                prefix = candidate;
            }
        }

        if prefix.is_empty() {
            prefix = &pair.name;
        }

        if !used.insert(prefix.to_string()) {
            debug!("dropping {pair}, prefix {prefix:?} is already taken");
            continue;
        }

        groups.push(PrefixGroup {
            prefix: prefix.to_string(),
            members: vec![pair.clone()],
        });
    }

    groups
}

// members one per line, groups separated by a blank line
pub fn format_groups(groups: &[PrefixGroup]) -> String {
    groups
        .iter()
        .map(|g| {
            g.members
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse::parse_pairs;

    #[test]
    fn common_prefix_respects_char_boundaries() {
        assert_eq!(common_prefix("color-primary", "color-secondary"), "color-");
        assert_eq!(common_prefix("größe-a", "größe-b"), "größe-");
        assert_eq!(common_prefix("abc", "xyz"), "");
        assert_eq!(common_prefix("", "abc"), "");
    }

    #[test]
    fn pairs_group_by_shared_prefix() {
        let pairs = parse_pairs("color-primary: #111\ncolor-secondary: #222\nsize-lg: 10");

        let groups = group_pairs(&pairs);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].prefix, "color-");
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[1].members, vec![Pair::new("size-lg", "10")]);
        assert_eq!(
            format_groups(&groups),
            "color-primary: #111\ncolor-secondary: #222\n\nsize-lg: 10"
        );
    }

    #[test]
    fn members_keep_group_creation_order() {
        let pairs = parse_pairs(
            "space-sm: 4\ncolor-bg: #fff\nspace-lg: 16\ncolor-fg: #000\nspace-md: 8",
        );

        let output = format_groups(&group_pairs(&pairs));

        assert_eq!(
            output,
            "space-sm: 4\nspace-lg: 16\nspace-md: 8\n\ncolor-bg: #fff\ncolor-fg: #000"
        );
    }

    #[test]
    fn every_pair_lands_in_exactly_one_group() {
        let pairs = parse_pairs(
            "font-size-sm: 12\nfont-size-lg: 18\nfont-weight-bold: 700\nradius: 4\nshadow-sm: x\nshadow-lg: y",
        );

        let groups = group_pairs(&pairs);
        let total: usize = groups.iter().map(|g| g.members.len()).sum();

        assert_eq!(total, pairs.len());
        for pair in &pairs {
            let holders = groups.iter().filter(|g| g.members.contains(pair)).count();
            assert_eq!(holders, 1, "{pair} should be in exactly one group");
        }
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(group_pairs(&[]).is_empty());
        assert_eq!(format_groups(&[]), "");
    }
}
