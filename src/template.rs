//! Template engine for `$variable` substitution.
//!
//! Used to render the generated WDL (task bodies, workflow calls) and nothing
//! else, so the syntax follows what WDL authors already expect from shell-like
//! placeholders.
//!
//! # Syntax
//!
//! - `$name` - Substitutes the value of variable `name`; the name is the
//!   longest run of ASCII letters, digits and `_` not starting with a digit
//! - `${name}` - Same, delimited, so it can be followed by identifier text
//! - `$$` - Renders as a literal `$`
//!
//! Undefined variables are an error rather than an empty substitution.

use crate::error::HydrantError;
use std::collections::HashMap;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    UndefinedVariable { name: String, position: usize },
    /// A `$` not followed by `$`, `{` or an identifier.
    InvalidPlaceholder { position: usize },
    /// A `${` without a matching `}`.
    UnclosedBrace { position: usize },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedVariable { name, position } => {
                write!(
                    f,
                    "undefined variable '{}' at position {} in template",
                    name, position
                )
            }
            TemplateError::InvalidPlaceholder { position } => {
                write!(f, "invalid placeholder at position {} in template", position)
            }
            TemplateError::UnclosedBrace { position } => {
                write!(f, "unclosed '${{' at position {} in template", position)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl From<TemplateError> for HydrantError {
    fn from(err: TemplateError) -> Self {
        HydrantError::UserError(err.to_string())
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn take_identifier(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        name.push(c);
        chars.next();
    }
    name
}

/// Render a template string by substituting variables.
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let name = match chars.peek().map(|&(_, c)| c) {
            Some('$') => {
                chars.next();
                result.push('$');
                continue;
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(TemplateError::UnclosedBrace { position: pos }),
                    }
                }
                let valid = name.starts_with(is_ident_start) && name.chars().all(is_ident_char);
                if !valid {
                    return Err(TemplateError::InvalidPlaceholder { position: pos });
                }
                name
            }
            Some(c) if is_ident_start(c) => take_identifier(&mut chars),
            _ => return Err(TemplateError::InvalidPlaceholder { position: pos }),
        };

        match variables.get(&name) {
            Some(value) => result.push_str(value),
            None => {
                return Err(TemplateError::UndefinedVariable {
                    name,
                    position: pos,
                });
            }
        }
    }

    Ok(result)
}

/// Helper to create a variables map from a list of key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
