//! `{key}` / `{key|fallback}` placeholder substitution.

use devpilot_core::{Args, CommandError};
use serde_json::Value;

/// Substitute placeholders in `template` from `args`.
///
/// Keys are identifiers. Anything else in braces (JSON, shell) is copied
/// through unchanged.
pub fn render(template: &str, args: &Args) -> Result<String, CommandError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find(['{', '}']);
        let Some(close) = close.filter(|&i| after[i..].starts_with('}')) else {
            out.push('{');
            rest = after;
            continue;
        };

        let inner = &after[..close];
        let (key, fallback) = match inner.split_once('|') {
            Some((key, fallback)) => (key, Some(fallback)),
            None => (inner, None),
        };
        if !is_key(key) {
            out.push('{');
            rest = after;
            continue;
        }

        match (args.get(key).and_then(scalar), fallback) {
            (Some(value), _) => out.push_str(&value),
            (None, Some(fallback)) => out.push_str(fallback),
            (None, None) => return Err(CommandError::MissingArgument(key.to_string())),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn is_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
