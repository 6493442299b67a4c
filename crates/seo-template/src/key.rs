//! Cache keys for processed templates.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Content-addressed key of one `process()` call.
///
/// Hashes the template text, the entity identity, the store id and a
/// fingerprint of the additional variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    hash: String,
}

impl TemplateKey {
    /// Compute the key.
    #[must_use]
    pub fn new(
        template: &str,
        entity_identity: &str,
        store_id: u32,
        vars: &BTreeMap<String, Value>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(template.as_bytes());
        hasher.update(b"\0");
        hasher.update(entity_identity.as_bytes());
        hasher.update(b"\0");
        hasher.update(store_id.to_le_bytes());
        hasher.update(b"\0");
        hasher.update(vars_fingerprint(vars).as_bytes());
        Self {
            hash: hex::encode(hasher.finalize()),
        }
    }

    /// Hex-encoded SHA-256 hash.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seo_template_{}", self.hash)
    }
}

/// Deterministic summary of additional variables.
///
/// Keys are visited in sorted order. Scalars contribute their value, arrays
/// their compact JSON. Objects contribute only their type tag and id, so two
/// objects with the same type and id produce the same fingerprint even when
/// their other fields differ.
pub(crate) fn vars_fingerprint(vars: &BTreeMap<String, Value>) -> String {
    vars.iter()
        .map(|(key, value)| {
            let part = match value {
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                Value::Array(_) => value.to_string(),
                Value::Object(map) => {
                    let kind = map
                        .get("entity_type")
                        .or_else(|| map.get("type"))
                        .and_then(Value::as_str)
                        .unwrap_or("object");
                    let id = map.get("id").map(Value::to_string).unwrap_or_default();
                    format!("{kind}#{id}")
                }
            };
            format!("{key}={part}")
        })
        .collect::<Vec<_>>()
        .join("|")
}
