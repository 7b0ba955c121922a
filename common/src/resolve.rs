use std::collections::{HashMap, HashSet};

use api::mode::{Mode, ModeId};

use crate::{mapping::ValueMapper, parse::parse_pairs};

// variable resolution across modes
//
// every mode is reduced to an ordered list of names and their (custom mapped) values.
// a name is only taken from its first line, except in the default mode where later
// lines win; either way it keeps the position of its first appearance.
//
// a value as written that names another variable of the same mode, or any variable declared by an
// earlier mode, is kept as an alias instead of a literal so that the outputs can emit a
// reference to it rather than repeating the shared value
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolved {
    Literal(String),
    Alias(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedEntry {
    pub name: String,
    pub value: Resolved,
}

#[derive(Clone, Debug)]
pub struct ResolvedMode {
    pub mode: Mode,
    pub entries: Vec<ResolvedEntry>,
}

impl ResolvedMode {
    pub fn get(&self, name: &str) -> Option<&Resolved> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }
}

pub fn resolve_modes(
    modes: &[Mode],
    inputs: &HashMap<ModeId, String>,
    mapper: &ValueMapper,
) -> Vec<ResolvedMode> {
    let mut prior_names: HashSet<String> = HashSet::new();
    let mut resolved = Vec::with_capacity(modes.len());

    for mode in modes {
        let input = inputs.get(&mode.id).map(String::as_str).unwrap_or_default();

        // (name, raw value, mapped value)
        let mut entries: Vec<(String, String, String)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for pair in parse_pairs(input) {
            let mapped = mapper.forward(&pair.name, &pair.value);

            match index.get(&pair.name) {
                Some(&i) => {
                    if mode.is_default() {
                        entries[i].1 = pair.value;
                        entries[i].2 = mapped;
                    }
                }
                None => {
                    index.insert(pair.name.clone(), entries.len());
                    entries.push((pair.name, pair.value, mapped));
                }
            }
        }

        let entries = entries
            .into_iter()
            .map(|(name, raw, mapped)| {
                let is_ref =
                    raw != name && (index.contains_key(&raw) || prior_names.contains(&raw));

                let value = if is_ref {
                    Resolved::Alias(raw)
                } else {
                    Resolved::Literal(mapped)
                };

                ResolvedEntry { name, value }
            })
            .collect();

        prior_names.extend(index.into_keys());

        resolved.push(ResolvedMode {
            mode: mode.clone(),
            entries,
        });
    }

    resolved
}

// follow aliases from a name until a literal turns up
//
// names are looked up in the given mode first and then in the earlier modes, most
// recent first.  cycles and dangling references resolve to nothing
pub fn resolve_literal<'a>(
    modes: &'a [ResolvedMode],
    mode_index: usize,
    name: &str,
) -> Option<&'a str> {
    let visible = modes.get(..=mode_index)?;
    let mut seen: HashSet<&str> = HashSet::new();

    let mut value = lookup(visible, name)?;

    loop {
        match value {
            Resolved::Literal(literal) => return Some(literal.as_str()),
            Resolved::Alias(target) => {
                if !seen.insert(target.as_str()) {
                    return None;
                }
                value = lookup(visible, target)?;
            }
        }
    }
}

fn lookup<'a>(visible: &'a [ResolvedMode], name: &str) -> Option<&'a Resolved> {
    visible.iter().rev().find_map(|m| m.get(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VKConfig;

    fn mode(name: &str, id: &str) -> Mode {
        Mode {
            name: name.to_string(),
            id: id.to_string(),
            content: String::new(),
        }
    }

    fn inputs(texts: &[(&str, &str)]) -> HashMap<ModeId, String> {
        texts
            .iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect()
    }

    #[test]
    fn first_line_wins_outside_default_mode() {
        let modes = vec![mode("Dark", "28:1")];
        let resolved = resolve_modes(
            &modes,
            &inputs(&[("28:1", "a: 1\nb: 2\na: 3")]),
            &ValueMapper::empty(),
        );

        assert_eq!(resolved[0].get("a"), Some(&Resolved::Literal("1".to_string())));
        assert_eq!(resolved[0].entries.len(), 2);
    }

    #[test]
    fn default_mode_overwrites_in_place() {
        let modes = vec![mode("Default", "28:1")];
        let resolved = resolve_modes(
            &modes,
            &inputs(&[("28:1", "a: 1\nb: 2\na: 3")]),
            &ValueMapper::empty(),
        );

        let names: Vec<_> = resolved[0].entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(resolved[0].get("a"), Some(&Resolved::Literal("3".to_string())));
    }

    #[test]
    fn references_become_aliases() {
        let modes = vec![mode("Default", "28:1"), mode("Dark", "28:2")];
        let resolved = resolve_modes(
            &modes,
            &inputs(&[
                ("28:1", "base-red: #f00\nerror: base-red\nself: self"),
                ("28:2", "warning: base-red\nlater: dark-only\ndark-only: #000"),
            ]),
            &ValueMapper::empty(),
        );

        assert_eq!(
            resolved[0].get("error"),
            Some(&Resolved::Alias("base-red".to_string()))
        );
        assert_eq!(
            resolved[0].get("self"),
            Some(&Resolved::Literal("self".to_string()))
        );
        // names from earlier modes and from anywhere in the same mode both count
        assert_eq!(
            resolved[1].get("warning"),
            Some(&Resolved::Alias("base-red".to_string()))
        );
        assert_eq!(
            resolved[1].get("later"),
            Some(&Resolved::Alias("dark-only".to_string()))
        );
    }

    #[test]
    fn later_modes_do_not_leak_backwards() {
        let modes = vec![mode("Light", "28:1"), mode("Dark", "28:2")];
        let resolved = resolve_modes(
            &modes,
            &inputs(&[("28:1", "a: b"), ("28:2", "b: #000")]),
            &ValueMapper::empty(),
        );

        assert_eq!(resolved[0].get("a"), Some(&Resolved::Literal("b".to_string())));
    }

    #[test]
    fn values_are_mapped_before_resolution() {
        let modes = vec![mode("Default", "28:1")];
        let resolved = resolve_modes(
            &modes,
            &inputs(&[("28:1", "color-is-underline: true\ncolor-size: 12px")]),
            &VKConfig::default().mapper().unwrap(),
        );

        assert_eq!(
            resolved[0].get("color-is-underline"),
            Some(&Resolved::Literal("underline".to_string()))
        );
        assert_eq!(
            resolved[0].get("color-size"),
            Some(&Resolved::Literal("12px".to_string()))
        );
    }

    #[test]
    fn mapped_keywords_are_not_taken_for_references() {
        let modes = vec![mode("Default", "28:1")];
        let resolved = resolve_modes(
            &modes,
            &inputs(&[("28:1", "underline: 2px\ntext-is-underline: true")]),
            &VKConfig::default().mapper().unwrap(),
        );

        assert_eq!(
            resolved[0].get("text-is-underline"),
            Some(&Resolved::Literal("underline".to_string()))
        );
    }

    #[test]
    fn literals_are_found_through_alias_chains() {
        let modes = vec![mode("Default", "28:1"), mode("Dark", "28:2")];
        let resolved = resolve_modes(
            &modes,
            &inputs(&[
                ("28:1", "red: #f00\nerror: red\nloop-a: loop-b\nloop-b: loop-a"),
                ("28:2", "danger: error"),
            ]),
            &ValueMapper::empty(),
        );

        assert_eq!(resolve_literal(&resolved, 1, "danger"), Some("#f00"));
        assert_eq!(resolve_literal(&resolved, 0, "loop-a"), None);
        assert_eq!(resolve_literal(&resolved, 0, "missing"), None);
    }
}
