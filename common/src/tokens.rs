use std::{collections::HashMap, sync::LazyLock};

use indexmap::IndexMap;
use regex::Regex;

use api::tokens::{
    AliasKind, Color, ResolvedTokenValue, TokenCollection, TokenType, TokenValue,
    TokenVariable, VariableAlias,
};

use crate::{
    config::TokensConfig,
    resolve::{Resolved, ResolvedMode, resolve_literal},
};

pub const ALL_SCOPES: &str = "ALL_SCOPES";

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{3}){1,2}$").expect("hex color regex is valid")
});
static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)(?:px|em|rem)?$").expect("float regex is valid")
});

// hex colors become normalized rgba, numbers (with an optional css length unit that is
// simply dropped) become floats, and everything else stays a string
pub fn classify(value: &str) -> TokenValue {
    if HEX_COLOR.is_match(value) {
        if let Some(color) = parse_hex(&value[1..]) {
            return TokenValue::Color(color);
        }
    }

    if let Some(number) = FLOAT
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        return TokenValue::Float(number);
    }

    TokenValue::String(value.to_string())
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|c| f64::from(c) / 255.0);

    let (r, g, b) = match hex.len() {
        // #abc is shorthand for #aabbcc
        3 => (
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        ),
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        _ => return None,
    };

    Some(Color { r, g, b, a: 1.0 })
}

// build a variable collection out of the resolved modes
//
// variables are listed in the order their names first appear, and get sequential ids
// in that order.  a mode that does not define a variable reuses the value from the
// first mode that does
pub fn export_tokens(resolved: &[ResolvedMode], config: &TokensConfig) -> TokenCollection {
    let mut names: Vec<&str> = Vec::new();
    let mut ids: HashMap<&str, String> = HashMap::new();

    for mode in resolved {
        for entry in &mode.entries {
            if !ids.contains_key(entry.name.as_str()) {
                ids.insert(&entry.name, format!("VariableID:{}", names.len() + 1));
                names.push(&entry.name);
            }
        }
    }

    let variables: Vec<TokenVariable> = names
        .iter()
        .map(|name| build_variable(resolved, &ids, name))
        .collect();

    TokenCollection {
        id: config.collection_id.clone(),
        name: config.collection_name.clone(),
        modes: resolved
            .iter()
            .map(|m| (m.mode.id.clone(), m.mode.name.clone()))
            .collect(),
        variable_ids: variables.iter().map(|v| v.id.clone()).collect(),
        variables,
    }
}

fn build_variable(
    resolved: &[ResolvedMode],
    ids: &HashMap<&str, String>,
    name: &str,
) -> TokenVariable {
    let per_mode: Vec<Option<(TokenValue, ResolvedTokenValue)>> = resolved
        .iter()
        .enumerate()
        .map(|(mode_index, mode)| {
            mode.get(name)
                .map(|value| mode_value(resolved, ids, mode_index, value))
        })
        .collect();

    // the first literal decides the type, then the first alias target
    let token_type = per_mode
        .iter()
        .flatten()
        .find_map(|(value, _)| value.token_type())
        .or_else(|| {
            per_mode
                .iter()
                .flatten()
                .find_map(|(_, resolved)| resolved.resolved_value.token_type())
        })
        .unwrap_or(TokenType::String);

    let fallback = per_mode.iter().flatten().next().cloned();

    let mut values_by_mode = IndexMap::new();
    let mut resolved_values_by_mode = IndexMap::new();

    for (mode, value) in resolved.iter().zip(per_mode) {
        if let Some((value, resolved_value)) = value.or_else(|| fallback.clone()) {
            values_by_mode.insert(mode.mode.id.clone(), value);
            resolved_values_by_mode.insert(mode.mode.id.clone(), resolved_value);
        }
    }

    TokenVariable {
        id: ids.get(name).cloned().unwrap_or_default(),
        name: name.to_string(),
        token_type,
        values_by_mode,
        resolved_values_by_mode,
        scopes: vec![ALL_SCOPES.to_string()],
        hidden_from_publishing: false,
        code_syntax: Default::default(),
    }
}

fn mode_value(
    resolved: &[ResolvedMode],
    ids: &HashMap<&str, String>,
    mode_index: usize,
    value: &Resolved,
) -> (TokenValue, ResolvedTokenValue) {
    match value {
        Resolved::Literal(literal) => {
            let value = classify(literal);

            (
                value.clone(),
                ResolvedTokenValue {
                    resolved_value: value,
                    alias: None,
                    alias_name: None,
                },
            )
        }
        Resolved::Alias(target) => {
            let target_id = ids.get(target.as_str()).cloned().unwrap_or_default();

            let resolved_value = match resolve_literal(resolved, mode_index, target) {
                Some(literal) => classify(literal),
                None => TokenValue::String(target.clone()),
            };

            (
                TokenValue::Alias(VariableAlias {
                    kind: AliasKind::VariableAlias,
                    id: target_id.clone(),
                }),
                ResolvedTokenValue {
                    resolved_value,
                    alias: Some(target_id),
                    alias_name: Some(target.clone()),
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use api::mode::Mode;

    use super::*;
    use crate::{config::VKConfig, resolve::resolve_modes};

    fn export(modes: &[(&str, &str, &str)]) -> TokenCollection {
        let mut inputs = HashMap::new();
        let modes: Vec<Mode> = modes
            .iter()
            .map(|(name, id, text)| {
                inputs.insert(id.to_string(), text.to_string());
                Mode {
                    name: name.to_string(),
                    id: id.to_string(),
                    content: String::new(),
                }
            })
            .collect();

        let resolved = resolve_modes(&modes, &inputs, &VKConfig::default().mapper().unwrap());
        export_tokens(&resolved, &TokensConfig::default())
    }

    #[test]
    fn values_are_classified() {
        assert_eq!(
            classify("#ff0000"),
            TokenValue::Color(Color {
                r: 1.0,
                g: 0.0,
                b: 0.0,
                a: 1.0
            })
        );
        assert_eq!(
            classify("#0f0"),
            TokenValue::Color(Color {
                r: 0.0,
                g: 1.0,
                b: 0.0,
                a: 1.0
            })
        );
        assert_eq!(classify("12px"), TokenValue::Float(12.0));
        assert_eq!(classify("1.5rem"), TokenValue::Float(1.5));
        assert_eq!(classify("#ff00"), TokenValue::String("#ff00".to_string()));
        assert_eq!(classify("bold"), TokenValue::String("bold".to_string()));
        assert_eq!(classify("-4px"), TokenValue::String("-4px".to_string()));
    }

    #[test]
    fn collection_lists_modes_and_variables_in_order() {
        let collection = export(&[
            ("Light", "28:1", "color-primary: #ffffff\nspacing: 8px"),
            ("Dark", "28:2", "color-primary: #000000\nweight: bold"),
        ]);

        assert_eq!(collection.id, "VariableCollectionId:28:3");
        assert_eq!(collection.name, "New Primitives");
        assert_eq!(collection.modes.get("28:2").map(String::as_str), Some("Dark"));
        assert_eq!(
            collection.variable_ids,
            vec!["VariableID:1", "VariableID:2", "VariableID:3"]
        );

        let primary = &collection.variables[0];
        assert_eq!(primary.token_type, TokenType::Color);
        assert_eq!(
            primary.values_by_mode.get("28:2"),
            Some(&TokenValue::Color(Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0
            }))
        );

        // only defined in light, so dark borrows it
        let spacing = &collection.variables[1];
        assert_eq!(spacing.token_type, TokenType::Float);
        assert_eq!(spacing.values_by_mode.get("28:2"), Some(&TokenValue::Float(8.0)));
        assert_eq!(spacing.scopes, vec![ALL_SCOPES]);
    }

    #[test]
    fn references_become_variable_aliases() {
        let collection = export(&[
            ("Default", "28:1", "red: #ff0000\nerror: red"),
            ("Dark", "28:2", "red: #880000"),
        ]);

        let error = &collection.variables[1];
        assert_eq!(error.token_type, TokenType::Color);
        assert_eq!(
            error.values_by_mode.get("28:1"),
            Some(&TokenValue::Alias(VariableAlias {
                kind: AliasKind::VariableAlias,
                id: "VariableID:1".to_string(),
            }))
        );

        let resolved = error.resolved_values_by_mode.get("28:1").unwrap();
        assert_eq!(resolved.alias.as_deref(), Some("VariableID:1"));
        assert_eq!(resolved.alias_name.as_deref(), Some("red"));
        assert_eq!(resolved.resolved_value.token_type(), Some(TokenType::Color));
    }

    #[test]
    fn alias_cycles_resolve_to_the_target_name() {
        let collection = export(&[("Default", "28:1", "loop-a: loop-b\nloop-b: loop-a")]);

        let loop_a = &collection.variables[0];
        assert_eq!(loop_a.token_type, TokenType::String);

        let resolved = loop_a.resolved_values_by_mode.get("28:1").unwrap();
        assert_eq!(
            resolved.resolved_value,
            TokenValue::String("loop-b".to_string())
        );
        assert_eq!(resolved.alias.as_deref(), Some("VariableID:2"));
    }

    #[test]
    fn document_serializes_with_plugin_field_names() {
        let collection = export(&[("Default", "28:1", "gap: 4px")]);

        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["variableIds"][0], "VariableID:1");
        assert_eq!(json["variables"][0]["type"], "FLOAT");
        assert_eq!(json["variables"][0]["valuesByMode"]["28:1"], 4.0);
        assert_eq!(json["variables"][0]["hiddenFromPublishing"], false);
        assert!(json["variables"][0]["resolvedValuesByMode"]["28:1"]["alias"].is_null());
    }
}
