use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, instrument};

use api::{
    css::OutputMode,
    tokens::{DEFAULT_COLLECTION_ID, DEFAULT_COLLECTION_NAME},
};

use crate::mapping::{DEFAULT_MAPPING_PATTERN, DEFAULT_MAPPING_VALUES, ValueMapper};

pub const DEFAULT_CONFIG_FILE: &str = "varkit.toml";
pub const DEFAULT_STATE_FILE: &str = "varkit-state.json";
pub const DEFAULT_CSS_SELECTOR: &str = r#"html[data-theme^="{mode}"]"#;

// varkit configuration
//
// every field has a default, so an empty (or missing) config file is perfectly usable
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct VKConfig {
    // json document holding the saved state of every tool
    pub state_file: PathBuf,

    // overridden by -v on the command line
    pub log_level: Option<String>,

    pub css: CssConfig,
    pub tokens: TokensConfig,

    // custom value mapping rules, in match order
    //
    // leaving this out keeps the built-in is-underline rule, while an empty list
    // disables mapping entirely
    pub mapping: Vec<MappingConfig>,
}

impl Default for VKConfig {
    fn default() -> Self {
        VKConfig {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            log_level: None,
            css: CssConfig::default(),
            tokens: TokensConfig::default(),
            mapping: vec![MappingConfig {
                pattern: DEFAULT_MAPPING_PATTERN.to_string(),
                values: DEFAULT_MAPPING_VALUES
                    .iter()
                    .map(|(raw, mapped)| MappingValue::new(raw, mapped))
                    .collect(),
            }],
        }
    }
}

impl VKConfig {
    pub fn mapper(&self) -> Result<ValueMapper> {
        ValueMapper::from_config(&self.mapping)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CssConfig {
    // selector wrapped around each mode's declarations, where {mode} is replaced
    // by the lowercased, dash-separated mode name
    pub selector: String,

    pub output: OutputMode,
}

impl Default for CssConfig {
    fn default() -> Self {
        CssConfig {
            selector: DEFAULT_CSS_SELECTOR.to_string(),
            output: OutputMode::Single,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TokensConfig {
    pub collection_id: String,
    pub collection_name: String,
}

impl Default for TokensConfig {
    fn default() -> Self {
        TokensConfig {
            collection_id: DEFAULT_COLLECTION_ID.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MappingConfig {
    pub pattern: String,
    pub values: Vec<MappingValue>,
}

// a table entry; a list of these (rather than a toml table) keeps the entries in
// order, which is what reverse lookups rely on
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MappingValue {
    pub raw: String,
    pub mapped: String,
}

impl MappingValue {
    pub fn new(raw: &str, mapped: &str) -> Self {
        MappingValue {
            raw: raw.to_string(),
            mapped: mapped.to_string(),
        }
    }
}

// in order to extract the config table from a larger document, we need to specify it
// as a subtable of the root node, i.e. a substruct
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfigFile {
    #[serde(default)]
    config: VKConfig,
}

pub fn parse_config(doc: &str) -> Result<VKConfig> {
    let data: TomlConfigFile = toml::from_str(doc).context("failed to parse config file")?;

    // catch bad patterns at startup instead of on first use
    data.config.mapper()?;

    Ok(data.config)
}

#[instrument(level=Level::DEBUG)]
pub async fn read_config(filename: PathBuf) -> Result<Arc<VKConfig>> {
    debug!("reading config file");

    let doc = tokio::fs::read_to_string(&filename)
        .await
        .with_context(|| format!("failed to read config file {filename:?}"))?;

    let config = parse_config(&doc)?;

    debug!("successfully parsed config file");
    Ok(Arc::new(config))
}

// an explicitly requested file must exist, but the default location is optional
#[instrument(level=Level::DEBUG)]
pub async fn load_config(filename: Option<PathBuf>) -> Result<Arc<VKConfig>> {
    match filename {
        Some(filename) => read_config(filename).await,
        None => {
            let filename = PathBuf::from(DEFAULT_CONFIG_FILE);

            if tokio::fs::try_exists(&filename).await? {
                read_config(filename).await
            } else {
                debug!("no config file found, using defaults");
                Ok(Arc::new(VKConfig::default()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
        assert_eq!(config.css.selector, DEFAULT_CSS_SELECTOR);
        assert_eq!(config.mapping.len(), 1);
    }

    #[test]
    fn subtables_override_defaults() {
        let doc = r#"
            [config]
            state_file = "/tmp/state.json"
            log_level = "debug"

            [config.css]
            selector = ".theme-{mode}"
            output = "tabs"

            [config.tokens]
            collection_name = "Brand"

            [[config.mapping]]
            pattern = "^visible"
            values = [{ raw = "yes", mapped = "visible" }, { raw = "no", mapped = "hidden" }]
        "#;

        let config = parse_config(doc).unwrap();

        assert_eq!(config.state_file, PathBuf::from("/tmp/state.json"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.css.output, OutputMode::Tabs);
        assert_eq!(config.tokens.collection_name, "Brand");
        assert_eq!(config.tokens.collection_id, DEFAULT_COLLECTION_ID);

        let mapper = config.mapper().unwrap();
        assert_eq!(mapper.forward("visible-footer", "no"), "hidden");
        assert_eq!(mapper.forward("link-is-underline", "true"), "true");
    }

    #[test]
    fn invalid_patterns_fail_to_load() {
        let doc = r#"
            [[config.mapping]]
            pattern = "[a-"
            values = []
        "#;

        assert!(parse_config(doc).is_err());
    }

    #[tokio::test]
    async fn explicit_missing_file_is_an_error() {
        let missing = PathBuf::from("/nonexistent/varkit.toml");

        assert!(load_config(Some(missing)).await.is_err());
    }
}
