use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::command;

// structs and types

pub type ModeId = String;

// a named variant of a variable set, like a light or dark theme
//
// content is carried for layout compatibility with older saved state; the text for
// each mode actually lives in ModeState::input
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Mode {
    pub name: String,
    pub id: ModeId,
    #[serde(default)]
    pub content: String,
}

impl Mode {
    // the default mode lets later lines override earlier ones instead of ignoring them
    pub fn is_default(&self) -> bool {
        self.name.to_lowercase() == "default"
    }

    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }
}

// the tools that operate over several modes at once
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ModeTool {
    Tokens,
    Css,
}

impl ModeTool {
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Tokens => "figma-variable-input",
            Self::Css => "css-variable-input",
        }
    }
}

// persisted state of a multi-mode tool
//
// the field names are part of the stored layout, so they are kept in camelCase
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeState {
    #[serde(default)]
    pub input: HashMap<ModeId, String>,
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub selected_mode_id: ModeId,
}

impl ModeState {
    // older state may have been saved before anything was selected
    pub fn normalize(mut self) -> Self {
        if self.selected_mode_id.is_empty() {
            if let Some(mode) = self.modes.first() {
                self.selected_mode_id = mode.id.clone();
            }
        }
        self
    }

    pub fn mode(&self, mode_id: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == mode_id)
    }

    pub fn input_for(&self, mode_id: &str) -> &str {
        self.input.get(mode_id).map(String::as_str).unwrap_or_default()
    }

    // ids follow the "28:n" scheme used by exported collections, skipping any that
    // were already taken by hand-edited state
    pub fn next_mode_id(&self) -> ModeId {
        let mut n = self.modes.len() + 1;

        loop {
            let id = format!("28:{n}");

            if self.mode(&id).is_none() {
                return id;
            }

            n += 1;
        }
    }

    // new modes start empty and become the selected mode
    pub fn add_mode(&mut self, name: &str) -> Mode {
        let mode = Mode {
            name: name.to_string(),
            id: self.next_mode_id(),
            content: String::new(),
        };

        self.modes.push(mode.clone());
        self.input.insert(mode.id.clone(), String::new());
        self.selected_mode_id = mode.id.clone();

        mode
    }
}

// messages

// create a new mode
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AddModeReq {
    pub tool: ModeTool,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AddModeResp {
    pub mode: Mode,
}

command! {AddMode}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ListModesReq {
    pub tool: ModeTool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ListModesResp {
    pub modes: Vec<Mode>,
    pub selected_mode_id: ModeId,
}

command! {ListModes}

// change which mode receives edits
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SelectModeReq {
    pub tool: ModeTool,
    pub mode_id: ModeId,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SelectModeResp {
    pub mode: Mode,
}

command! {SelectMode}

// replace the text of a mode, or of the selected mode when no id is given
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SetModeInputReq {
    pub tool: ModeTool,
    pub mode_id: Option<ModeId>,
    pub input: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SetModeInputResp {
    pub mode_id: ModeId,
}

command! {SetModeInput}

impl Display for ModeTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tokens => write!(f, "tokens"),
            Self::Css => write!(f, "css"),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_layout_uses_camel_case() {
        let doc = r#"{"input":{"28:1":"a: b"},"modes":[{"name":"Light","id":"28:1","content":""}],"selectedModeId":"28:1"}"#;

        let state: ModeState = serde_json::from_str(doc).unwrap();

        assert_eq!(state.mode(&state.selected_mode_id).unwrap().name, "Light");
        assert_eq!(state.input_for("28:1"), "a: b");
    }

    #[test]
    fn missing_selection_falls_back_to_first_mode() {
        let doc = r#"{"modes":[{"name":"Light","id":"28:1"},{"name":"Dark","id":"28:2"}]}"#;

        let state: ModeState = serde_json::from_str::<ModeState>(doc).unwrap().normalize();

        assert_eq!(state.selected_mode_id, "28:1");
        assert_eq!(state.input_for("28:2"), "");
    }

    #[test]
    fn added_modes_are_selected_with_fresh_ids() {
        let mut state = ModeState::default();

        let light = state.add_mode("Light");
        let dark = state.add_mode("Dark Mode");

        assert_eq!(light.id, "28:1");
        assert_eq!(dark.id, "28:2");
        assert_eq!(dark.slug(), "dark-mode");
        assert_eq!(state.selected_mode_id, "28:2");
    }

    #[test]
    fn next_id_skips_taken_ids() {
        let mut state = ModeState::default();
        state.modes.push(Mode {
            name: "Odd".to_string(),
            id: "28:2".to_string(),
            content: String::new(),
        });

        assert_eq!(state.add_mode("Next").id, "28:3");
    }
}
