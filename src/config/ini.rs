//! INI lexer for hydrant config files.
//!
//! The accepted dialect is the one the config files have always been written
//! in:
//!
//! - `[Section]` headers; section names are case-sensitive and kept verbatim
//! - `key = value` or `key : value`, split on the first `=` or `:`; key case
//!   is preserved and both sides are trimmed
//! - a line with no delimiter declares a key with no value
//! - full-line comments start with `#` or `;`
//! - lines indented deeper than their key continue the previous value
//!   (joined with `\n`); blank lines inside a continued value are kept,
//!   trailing ones are dropped
//!
//! Interpolation (`%(key)s`) is not expanded here: it only makes sense once
//! all layers are merged, so the lexer keeps raw values.

use crate::error::{HydrantError, Result};
use indexmap::IndexMap;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?P<header>.+)\]").expect("valid section regex"));

static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>.*?)\s*(?:(?P<delim>[=:])\s*(?P<value>.*))?$")
        .expect("valid option regex")
});

/// Raw key/value pairs of one section, in file order.
pub type RawEntries = IndexMap<String, Option<String>>;

/// One parsed INI file: sections in file order, each with its raw entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniFile {
    pub sections: IndexMap<String, RawEntries>,
}

impl IniFile {
    /// Parse INI text. `path` is only used for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut sections: IndexMap<String, RawEntries> = IndexMap::new();
        let mut current: Option<String> = None;
        // Key that an indented line would continue, with its indentation.
        let mut last_key: Option<(String, usize)> = None;
        // Blank lines seen since the last line of the open value.
        let mut pending_blanks = 0;

        for (idx, raw_line) in text.lines().enumerate() {
            let lineno = idx + 1;
            let line = raw_line.trim_end();
            let stripped = line.trim_start();

            if stripped.is_empty() {
                let continues = match (&current, &last_key) {
                    (Some(section), Some((key, _))) => sections
                        .get(section)
                        .and_then(|entries| entries.get(key))
                        .is_some_and(|value| value.is_some()),
                    _ => false,
                };
                if continues {
                    pending_blanks += 1;
                } else {
                    last_key = None;
                }
                continue;
            }
            if stripped.starts_with('#') || stripped.starts_with(';') {
                continue;
            }

            let indent = line.len() - stripped.len();
            if let (Some(section), Some((key, key_indent))) = (&current, &last_key)
                && indent > *key_indent
            {
                let entries = sections.entry(section.clone()).or_default();
                match entries.get_mut(key).and_then(|v| v.as_mut()) {
                    Some(value) => {
                        for _ in 0..=pending_blanks {
                            value.push('\n');
                        }
                        value.push_str(stripped);
                        pending_blanks = 0;
                    }
                    None => {
                        return Err(parse_error(
                            path,
                            lineno,
                            format!("continuation line for key '{}' which has no value", key),
                        ));
                    }
                }
                continue;
            }

            if let Some(caps) = SECTION_RE.captures(stripped) {
                let name = caps["header"].to_string();
                if sections.contains_key(&name) {
                    return Err(parse_error(
                        path,
                        lineno,
                        format!("section '{}' already exists", name),
                    ));
                }
                sections.insert(name.clone(), RawEntries::new());
                current = Some(name);
                last_key = None;
                pending_blanks = 0;
                continue;
            }

            let Some(section) = &current else {
                return Err(parse_error(
                    path,
                    lineno,
                    format!("key '{}' appears before any section header", stripped),
                ));
            };

            let Some(caps) = OPTION_RE.captures(stripped) else {
                return Err(parse_error(path, lineno, format!("cannot parse '{}'", stripped)));
            };
            let key = caps["key"].trim_end().to_string();
            if key.is_empty() {
                return Err(parse_error(path, lineno, format!("empty key in '{}'", stripped)));
            }
            let value = caps
                .name("delim")
                .map(|_| caps.name("value").map_or("", |m| m.as_str()).trim().to_string());

            let entries = sections.entry(section.clone()).or_default();
            if entries.contains_key(&key) {
                return Err(parse_error(
                    path,
                    lineno,
                    format!("key '{}' already exists in section '{}'", key, section),
                ));
            }
            entries.insert(key.clone(), value);
            last_key = Some((key, indent));
            pending_blanks = 0;
        }

        Ok(Self { sections })
    }
}

fn parse_error(path: &Path, lineno: usize, message: String) -> HydrantError {
    HydrantError::config_parse(path, format!("line {}: {}", lineno, message))
}
