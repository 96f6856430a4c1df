//! The test inputs JSON of a workflow (`tests/inputs.json`).
//!
//! The WDL validator emits a skeleton mapping every input to a type
//! placeholder (`"String"`, `"Int? (optional)"`, `"Array[File]"`). Each
//! `validate` run regenerates the skeleton and carries over the values the
//! user already filled in.

use crate::error::{HydrantError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\(optional\)\s*)?(?:File|String|Int|Float|Boolean|Object|Directory|(?:Array|Map|Pair)\[.*\])[?+]?(?:\s*\(optional\))?$",
    )
    .expect("placeholder regex is valid")
});

/// Whether a value is a type placeholder rather than something a user set.
pub fn is_type_placeholder(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| PLACEHOLDER_RE.is_match(s.trim()))
}

fn is_boolean_placeholder(value: &Value) -> bool {
    is_type_placeholder(value)
        && value
            .as_str()
            .is_some_and(|s| s.trim_start_matches("(optional)").trim().starts_with("Boolean"))
}

/// Workflow-level inputs first, then task-level ones: fewer dots first,
/// then by name.
pub fn input_order(a: &str, b: &str) -> Ordering {
    let dots = |s: &str| s.matches('.').count();
    dots(a).cmp(&dots(b)).then_with(|| a.cmp(b))
}

/// Read and parse an inputs file.
pub fn read_inputs(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HydrantError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => HydrantError::UserError(format!("failed to read '{}': {}", path.display(), e)),
    })?;
    serde_json::from_str(&content).map_err(|e| {
        HydrantError::UserError(format!("invalid JSON in '{}': {}", path.display(), e))
    })
}

/// Combine a freshly generated skeleton with a previous inputs file.
///
/// Keys come from the skeleton only; a previous value survives if it is not
/// itself a placeholder. Remaining `*.package` Boolean placeholders are
/// switched on so local runs never try to localize the null package file.
pub fn merge_inputs(generated: &str, previous: Option<&Map<String, Value>>) -> Result<String> {
    let generated: Map<String, Value> = serde_json::from_str(generated).map_err(|e| {
        HydrantError::ToolError(format!("validator produced invalid inputs JSON: {}", e))
    })?;

    let mut entries: Vec<(String, Value)> = generated
        .into_iter()
        .map(|(key, value)| {
            let value = match previous.and_then(|p| p.get(&key)) {
                Some(old) if !is_type_placeholder(old) => old.clone(),
                _ => value,
            };
            let value = if key.ends_with(".package") && is_boolean_placeholder(&value) {
                Value::Bool(true)
            } else {
                value
            };
            (key, value)
        })
        .collect();
    entries.sort_by(|(a, _), (b, _)| input_order(a, b));

    render_inputs(&entries)
}

/// Render entries as a JSON object, one key per line, in the given order.
///
/// Nested values are pretty-printed and indented under their key.
pub fn render_inputs(entries: &[(String, Value)]) -> Result<String> {
    if entries.is_empty() {
        return Ok("{}\n".to_string());
    }
    let mut lines = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let value = serde_json::to_string_pretty(value).map_err(|e| {
            HydrantError::UserError(format!("failed to render input '{}': {}", key, e))
        })?;
        lines.push(format!(
            "  {}: {}",
            Value::String(key.clone()),
            value.replace('\n', "\n  ")
        ));
    }
    Ok(format!("{{\n{}\n}}\n", lines.join(",\n")))
}
