use anyhow::{Context, Result};
use regex::Regex;

use crate::config::MappingConfig;

// custom value mapping
//
// some variables carry raw values that the stylesheet wants spelled differently (the
// classic case being boolean flags that become keyword values).  each rule pairs a
// regex over the variable name with an ordered table of raw -> mapped values, and
// the first rule whose pattern matches the name is the only one consulted.
//
// reverse lookups scan the table for the first matching mapped value, so a table
// that maps two raw values to the same output cannot be reversed unambiguously
pub const DEFAULT_MAPPING_PATTERN: &str = ".*is-underline";
pub const DEFAULT_MAPPING_VALUES: &[(&str, &str)] =
    &[("false", "nounderline"), ("true", "underline")];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Clone, Debug)]
pub struct MappingRule {
    pattern: Regex,
    table: Vec<(String, String)>,
}

impl MappingRule {
    pub fn new(pattern: &str, table: Vec<(String, String)>) -> Result<Self> {
        let pattern =
            Regex::new(pattern).with_context(|| format!("invalid mapping pattern {pattern:?}"))?;

        Ok(MappingRule { pattern, table })
    }

    fn forward(&self, value: &str) -> Option<&str> {
        self.table
            .iter()
            .find(|(raw, _)| raw == value)
            .map(|(_, mapped)| mapped.as_str())
    }

    fn reverse(&self, value: &str) -> Option<&str> {
        self.table
            .iter()
            .find(|(_, mapped)| mapped == value)
            .map(|(raw, _)| raw.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ValueMapper {
    rules: Vec<MappingRule>,
}

impl ValueMapper {
    pub fn new(rules: Vec<MappingRule>) -> Self {
        ValueMapper { rules }
    }

    // a mapper that leaves every value alone
    pub fn empty() -> Self {
        ValueMapper { rules: Vec::new() }
    }

    pub fn from_config(rules: &[MappingConfig]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                MappingRule::new(
                    &rule.pattern,
                    rule.values
                        .iter()
                        .map(|v| (v.raw.clone(), v.mapped.clone()))
                        .collect(),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ValueMapper { rules })
    }

    pub fn apply(&self, name: &str, value: &str, direction: Direction) -> String {
        let Some(rule) = self.rules.iter().find(|r| r.pattern.is_match(name)) else {
            return value.to_string();
        };

        let found = match direction {
            Direction::Forward => rule.forward(value),
            Direction::Reverse => rule.reverse(value),
        };

        found.unwrap_or(value).to_string()
    }

    pub fn forward(&self, name: &str, value: &str) -> String {
        self.apply(name, value, Direction::Forward)
    }

    pub fn reverse(&self, name: &str, value: &str) -> String {
        self.apply(name, value, Direction::Reverse)
    }
}
