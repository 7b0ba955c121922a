use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::command;

// storage keys for the single-input tools
pub const DEDUPE_INPUT_KEY: &str = "dedupe-input";
pub const DEDUPE_OUTPUT_KEY: &str = "dedupe-output";
pub const SORT_INPUT_KEY: &str = "sort-input";
pub const SORT_OUTPUT_KEY: &str = "sort-output";
pub const GROUP_INPUT_KEY: &str = "group-input";
pub const GROUP_OUTPUT_KEY: &str = "group-output";

// structs and types

// a single `name: value` line
//
// the parser guarantees that both halves are trimmed and non-empty
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Pair {
    pub name: String,
    pub value: String,
}

impl Pair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Pair {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SortKey {
    #[default]
    Key,
    Value,
}

// messages
//
// for all of these, a missing input means "reuse whatever was stored last time"

// replace repeated values with the name of the first variable that held them
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DedupeReq {
    pub input: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DedupeResp {
    pub output: String,
    pub duplicates: usize,
}

command! {Dedupe}

// undo a dedupe by resolving references back to the values they stand for
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReverseDedupeReq {
    pub input: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReverseDedupeResp {
    pub output: String,
    pub replacements: usize,
}

command! {ReverseDedupe}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SortReq {
    pub input: Option<String>,
    pub by: SortKey,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SortResp {
    pub output: String,
    pub lines: usize,
}

command! {Sort}

// split a flat list into blocks by shared name prefix
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GroupReq {
    pub input: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GroupResp {
    pub output: String,
    pub groups: usize,
}

command! {Group}

// display impls so that we can output these cleanly to logs
impl Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key => write!(f, "key"),
            Self::Value => write!(f, "value"),
        }
    }
}
