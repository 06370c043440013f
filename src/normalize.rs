//! Key-casing normalization for served responses.
//!
//! Scripted payloads are authored in snake_case for readability; the real
//! endpoint this server stands in for speaks camelCase on the wire. Every
//! response is rewritten at serve time, after it is popped from its queue,
//! so cached queue entries keep their original form.

use serde_json::Value;

/// Convert a snake_case key to camelCase.
///
/// The first underscore-delimited segment stays lowercase; each subsequent
/// segment is capitalized at its first character and the underscores are
/// removed. A key without underscores is returned unchanged.
fn to_camel_case(key: &str) -> String {
    let mut segments = key.split('_');
    let mut out = String::with_capacity(key.len());
    if let Some(first) = segments.next() {
        out.push_str(first);
    }
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Recursively rewrite every object key in `value` from snake_case to
/// camelCase.
///
/// Objects get a fresh map with rewritten keys and normalized values, arrays
/// are normalized per element with order preserved, and scalars pass through
/// untouched. The rewrite is not idempotent in general (a camelCase key that
/// still contains underscores would be transformed again), so it must be
/// applied exactly once per served response.
#[must_use]
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (to_camel_case(&key), normalize_keys(val)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}
