//! Structured fields and their `key=value` rendering

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Field name → value mapping attached to an entry
///
/// A `BTreeMap` so fields always render in key order.
pub type Fields = BTreeMap<String, Value>;

/// True when `text` has to be quoted to survive as a single token
pub fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || !text
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

/// Append `text` to `out`, quoted and escaped if it needs to be
pub fn push_value(out: &mut String, text: &str) {
    if needs_quoting(text) {
        let _ = write!(out, "{:?}", text);
    } else {
        out.push_str(text);
    }
}

/// Append a single ` key=value` pair, with a leading separator if `out` is non-empty
pub fn push_pair(out: &mut String, key: &str, value: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(key);
    out.push('=');
    push_value(out, value);
}

/// Plain text for a JSON value: strings unwrapped, everything else as JSON
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Columns every line already has; entry fields with these names get a `fields.` prefix
const RESERVED_KEYS: [&str; 3] = ["time", "level", "msg"];

/// Render fields as space separated `key=value` pairs in key order
pub fn render_fields(fields: &Fields) -> String {
    let mut out = String::new();
    for (key, value) in fields {
        let text = value_text(value);
        if RESERVED_KEYS.contains(&key.as_str()) {
            push_pair(&mut out, &format!("fields.{key}"), &text);
        } else {
            push_pair(&mut out, key, &text);
        }
    }
    out
}
