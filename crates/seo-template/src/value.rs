//! Conversion of attribute values to template text.

use serde_json::Value;

/// Render a JSON value as template text.
///
/// Strings are used as-is, booleans become `1`/`0`, null becomes empty,
/// lists of scalars are joined with `, ` and objects fall back to compact
/// JSON.
pub(crate) fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(is_scalar) => items
            .iter()
            .map(to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Walk `segments` through nested objects (by key) and arrays (by index).
///
/// Returns `None` at the first dead end.
pub(crate) fn traverse<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Price with exactly two decimals (`19.9` → `"19.90"`).
#[must_use]
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
