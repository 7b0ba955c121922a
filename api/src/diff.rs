use serde::{Deserialize, Serialize};

use crate::{command, text::Pair};

pub const DIFF_ORIGINAL_KEY: &str = "diff-viewer-original";
pub const DIFF_MODIFIED_KEY: &str = "diff-viewer-modified";

// structs and types

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PairChange {
    pub name: String,
    pub old: String,
    pub new: String,
}

// variable-level view of a diff, with each list in input order
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PairDiff {
    pub added: Vec<Pair>,
    pub removed: Vec<Pair>,
    pub changed: Vec<PairChange>,
}

impl PairDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

// messages

// compare two versions of a variable file
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DiffReq {
    pub original: Option<String>,
    pub modified: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DiffResp {
    // unified line diff, empty when the inputs are identical
    pub unified: String,
    pub changes: PairDiff,
}

command! {Diff}
