use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{command, mode::ModeId};

pub const DEFAULT_COLLECTION_ID: &str = "VariableCollectionId:28:3";
pub const DEFAULT_COLLECTION_NAME: &str = "New Primitives";

// structs and types
//
// these mirror the variable collection json understood by figma's import plugins,
// which is why the serialized names are camelCase and the enums are SCREAMING_CASE.
// per-mode tables are keyed by mode id in mode order; ids like "28:10" sort wrong

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    Color,
    Float,
    String,
}

// channels are normalized to 0..=1
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AliasKind {
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct VariableAlias {
    #[serde(rename = "type")]
    pub kind: AliasKind,
    pub id: String,
}

// untagged so that literals serialize as bare json values; the order matters for
// deserialization since a float would otherwise never be tried before a string
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Alias(VariableAlias),
    Color(Color),
    Float(f64),
    String(String),
}

impl TokenValue {
    pub fn token_type(&self) -> Option<TokenType> {
        match self {
            Self::Alias(_) => None,
            Self::Color(_) => Some(TokenType::Color),
            Self::Float(_) => Some(TokenType::Float),
            Self::String(_) => Some(TokenType::String),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTokenValue {
    pub resolved_value: TokenValue,
    // id of the aliased variable, serialized as null for literals
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenVariable {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub values_by_mode: IndexMap<ModeId, TokenValue>,
    pub resolved_values_by_mode: IndexMap<ModeId, ResolvedTokenValue>,
    pub scopes: Vec<String>,
    pub hidden_from_publishing: bool,
    pub code_syntax: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCollection {
    pub id: String,
    pub name: String,
    pub modes: IndexMap<ModeId, String>,
    pub variable_ids: Vec<String>,
    pub variables: Vec<TokenVariable>,
}

// messages

// convert every mode of the token tool into a variable collection
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExportTokensReq {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExportTokensResp {
    pub collection: TokenCollection,
}

command! {ExportTokens}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_tables_keep_mode_order() {
        let collection = TokenCollection {
            id: DEFAULT_COLLECTION_ID.to_string(),
            name: DEFAULT_COLLECTION_NAME.to_string(),
            modes: IndexMap::from([
                ("28:10".to_string(), "Dark".to_string()),
                ("28:2".to_string(), "Light".to_string()),
            ]),
            variable_ids: Vec::new(),
            variables: Vec::new(),
        };

        let json = serde_json::to_string(&collection).unwrap();

        assert!(json.contains(r#""modes":{"28:10":"Dark","28:2":"Light"}"#));

        let back: TokenCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, collection);
    }

    #[test]
    fn values_serialize_like_the_plugin_expects() {
        let alias = TokenValue::Alias(VariableAlias {
            kind: AliasKind::VariableAlias,
            id: "VariableID:1".to_string(),
        });

        assert_eq!(
            serde_json::to_string(&alias).unwrap(),
            r#"{"type":"VARIABLE_ALIAS","id":"VariableID:1"}"#
        );
        assert_eq!(serde_json::to_string(&TokenValue::Float(12.0)).unwrap(), "12.0");

        let literal = ResolvedTokenValue {
            resolved_value: TokenValue::String("bold".to_string()),
            alias: None,
            alias_name: None,
        };

        assert_eq!(
            serde_json::to_string(&literal).unwrap(),
            r#"{"resolvedValue":"bold","alias":null}"#
        );
    }
}
