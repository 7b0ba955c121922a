use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use api::css::{CssOutput, OutputMode};

use crate::{
    mapping::ValueMapper,
    resolve::{Resolved, ResolvedMode},
};

pub const SINGLE_OUTPUT_TITLE: &str = "CSS Output";

// `--name: value;` and `--name: var(--ref);`, anywhere on a line
static DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--([^:]+):\s*([^;]+);").expect("declaration regex is valid"));
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--([^:]+):\s*var\(--([^)]*)\)\s*;").expect("reference regex is valid")
});

// one block of custom properties per mode, titled by the mode name
pub fn generate_css(resolved: &[ResolvedMode], selector: &str) -> Vec<CssOutput> {
    resolved
        .iter()
        .map(|mode| {
            let mut css = format!("{} {{\n", selector.replace("{mode}", &mode.mode.slug()));

            for entry in &mode.entries {
                match &entry.value {
                    Resolved::Alias(target) => {
                        css += &format!("  --{}: var(--{});\n", entry.name, target)
                    }
                    Resolved::Literal(value) => css += &format!("  --{}: {};\n", entry.name, value),
                }
            }

            css += "}";

            CssOutput {
                title: mode.mode.name.clone(),
                content: css,
            }
        })
        .collect()
}

pub fn arrange_outputs(outputs: Vec<CssOutput>, mode: OutputMode) -> Vec<CssOutput> {
    match mode {
        OutputMode::Tabs => outputs,
        OutputMode::Single => vec![CssOutput {
            title: SINGLE_OUTPUT_TITLE.to_string(),
            content: outputs
                .into_iter()
                .map(|o| o.content)
                .collect::<Vec<_>>()
                .join("\n\n"),
        }],
    }
}

// turn custom property declarations back into `name: value` lines
//
// only lines containing "--" are considered, and values are passed back through the
// reverse custom mapping.  references stay references unless inline_aliases is set,
// in which case they take the value declared for their target (one level deep) and
// references to undeclared names are dropped
pub fn reverse_css(css: &str, mapper: &ValueMapper, inline_aliases: bool) -> String {
    let lines: Vec<&str> = css
        .lines()
        .filter(|line| !line.trim().is_empty() && line.contains("--"))
        .collect();

    let mut declared: HashMap<&str, &str> = HashMap::new();
    for line in &lines {
        if let Some(caps) = DECLARATION.captures(line) {
            if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
                declared.insert(name.as_str().trim(), value.as_str().trim());
            }
        }
    }

    let mut output: Vec<String> = Vec::new();

    for line in &lines {
        if let Some(caps) = REFERENCE.captures(line) {
            let (Some(name), Some(target)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let (name, target) = (name.as_str().trim(), target.as_str().trim());

            if !inline_aliases {
                output.push(format!("{name}: {target}"));
            } else if let Some(value) = declared.get(target) {
                output.push(format!("{name}: {}", mapper.reverse(name, value)));
            }
        } else if let Some(caps) = DECLARATION.captures(line) {
            let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let name = name.as_str().trim();

            output.push(format!(
                "{name}: {}",
                mapper.reverse(name, value.as_str().trim())
            ));
        }
    }

    output.join("\n")
}
