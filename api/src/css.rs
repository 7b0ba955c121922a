use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{command, mode::ModeId};

// structs and types

// single joins every mode into one stylesheet, tabs keeps one block per mode
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputMode {
    #[default]
    Single,
    Tabs,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CssOutput {
    pub title: String,
    pub content: String,
}

// messages

// render the custom properties for every mode, falling back to the configured
// output mode when none is given
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GenerateCssReq {
    pub output: Option<OutputMode>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GenerateCssResp {
    pub outputs: Vec<CssOutput>,
}

command! {GenerateCss}

// parse generated css back into `name: value` lines and store them as the input
// of a mode (the selected one by default)
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReverseCssReq {
    pub css: String,
    pub mode_id: Option<ModeId>,
    // replace var(--x) references with the value declared for x
    pub inline_aliases: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReverseCssResp {
    pub mode_id: ModeId,
    pub input: String,
}

command! {ReverseCss}

impl Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Tabs => write!(f, "tabs"),
        }
    }
}
