//! JSON-LD `<script>` rendering.

use serde_json::{Map, Value};

use crate::context::SCHEMA_CONTEXT;
use crate::generator::StructuredData;

const SCRIPT_OPEN: &str = r#"<script type="application/ld+json">"#;
const SCRIPT_CLOSE: &str = "</script>";

/// Renders structured data as JSON-LD script tags.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonLd;

impl JsonLd {
    /// Render `data` as one script tag.
    ///
    /// A list of several documents becomes a single `@graph`. Empty input
    /// renders as an empty string.
    #[must_use]
    pub fn render(data: &Value) -> String {
        let prepared = Self::prepare_data(data);
        if is_blank(&prepared) {
            return String::new();
        }
        match serde_json::to_string_pretty(&prepared) {
            Ok(json) => format!("{SCRIPT_OPEN}\n{}\n{SCRIPT_CLOSE}", escape_script_end(&json)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode JSON-LD");
                String::new()
            }
        }
    }

    /// Render each non-empty document as its own script tag, one per line.
    #[must_use]
    pub fn render_multiple(items: &[StructuredData]) -> String {
        items
            .iter()
            .filter(|item| !item.is_empty())
            .map(|item| Self::render(&Value::Object(item.clone())))
            .filter(|html| !html.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Normalize `data` for output.
    ///
    /// Several documents are wrapped as `{"@context": ..., "@graph": [...]}`,
    /// a single-element list is unwrapped, and objects get `@context` as their
    /// first key.
    #[must_use]
    pub fn prepare_data(data: &Value) -> Value {
        match data {
            Value::Array(items) => match items.as_slice() {
                [] => Value::Null,
                [single] => Self::prepare_data(single),
                _ => {
                    let mut graph = Map::new();
                    graph.insert("@context".to_owned(), Value::from(SCHEMA_CONTEXT));
                    graph.insert("@graph".to_owned(), Value::Array(items.clone()));
                    Value::Object(graph)
                }
            },
            Value::Object(map) if map.is_empty() => Value::Null,
            Value::Object(map) => Value::Object(context_first(map)),
            other => other.clone(),
        }
    }

    /// Whether every document in `data` carries a `@type` and the whole can
    /// be encoded.
    #[must_use]
    pub fn validate(data: &Value) -> bool {
        let typed = match data {
            Value::Array(items) => !items.is_empty() && items.iter().all(has_type),
            Value::Object(map) => match map.get("@graph") {
                Some(Value::Array(items)) => !items.is_empty() && items.iter().all(has_type),
                _ => has_type(data),
            },
            _ => false,
        };
        typed && serde_json::to_string(data).is_ok()
    }
}

fn context_first(map: &Map<String, Value>) -> Map<String, Value> {
    let mut ordered = Map::new();
    ordered.insert(
        "@context".to_owned(),
        map.get("@context")
            .cloned()
            .unwrap_or_else(|| Value::from(SCHEMA_CONTEXT)),
    );
    for (key, value) in map {
        if key != "@context" {
            ordered.insert(key.clone(), value.clone());
        }
    }
    ordered
}

fn has_type(value: &Value) -> bool {
    value
        .get("@type")
        .is_some_and(|t| t.as_str().is_some_and(|s| !s.is_empty()) || t.is_array())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Keep a `</script>` inside a string value from closing the tag early.
fn escape_script_end(json: &str) -> String {
    json.replace("</script", r"<\/script")
}
