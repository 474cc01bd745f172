//! Serializable pipeline definitions shared by the config file and the CLI.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PipeVerbError;

// ---------------------------------------------------------------------------
// StepSpec
// ---------------------------------------------------------------------------

/// One pipeline stage by name: the verb to call and the arguments to call it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Registered verb name (e.g. `groupby`).
    pub verb: String,
    /// Positional arguments, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    /// Named arguments.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kwargs: BTreeMap<String, Value>,
}

impl StepSpec {
    /// A step with no arguments.
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }
}

/// Parses the CLI step syntax: `verb` or `verb:arg,arg,key=value`.
///
/// Each value is read as JSON and falls back to a plain string, so
/// `groupby:b` and `groupby:"b"` are equivalent. Commas nested inside
/// brackets, braces or quotes do not split arguments.
impl FromStr for StepSpec {
    type Err = PipeVerbError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, rest) = match s.split_once(':') {
            Some((verb, rest)) => (verb.trim(), Some(rest)),
            None => (s, None),
        };

        if verb.is_empty() || !verb.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(PipeVerbError::parse(format!("invalid verb name in step '{s}'")));
        }

        let mut step = StepSpec::new(verb);
        let Some(rest) = rest else {
            return Ok(step);
        };

        let parts = split_top_level(rest).ok_or_else(|| {
            PipeVerbError::parse(format!("unbalanced brackets or quotes in step '{s}'"))
        })?;
        for part in parts {
            let part = part.trim();
            if part.is_empty() {
                return Err(PipeVerbError::parse(format!("empty argument in step '{s}'")));
            }
            match keyword(part) {
                Some((key, value)) => {
                    step.kwargs.insert(key.to_string(), parse_value(value));
                }
                None => {
                    if !step.kwargs.is_empty() {
                        return Err(PipeVerbError::parse(format!(
                            "positional argument '{part}' follows a keyword argument in step '{s}'"
                        )));
                    }
                    step.args.push(parse_value(part));
                }
            }
        }

        Ok(step)
    }
}

/// Split on commas that are not nested in `[]`, `{}` or a string literal.
/// `None` if brackets or quotes are unbalanced.
fn split_top_level(s: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_string || depth != 0 {
        return None;
    }
    parts.push(&s[start..]);
    Some(parts)
}

/// Returns `(key, value)` if `part` looks like `identifier=value`.
fn keyword(part: &str) -> Option<(&str, &str)> {
    let (key, value) = part.split_once('=')?;
    let key = key.trim();
    let is_ident = !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_alphanumeric() || c == '_');
    is_ident.then_some((key, value.trim()))
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

// ---------------------------------------------------------------------------
// PipelineDef
// ---------------------------------------------------------------------------

/// A named pipeline stored in the config file (`[[pipelines]]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDef {
    /// Name used with `pipeverb run --pipeline <name>`.
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered stages.
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}
