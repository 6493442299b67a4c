//! Template applicability conditions.
//!
//! Conditions are stored as a JSON object mapping an attribute code to one
//! of three shapes:
//!
//! - a scalar: the attribute must loosely equal it (`"1"` equals `1`)
//! - a list: the attribute must be strictly one of its members
//! - `{"min": .., "max": ..}`: the attribute, read as a number, must fall in
//!   the inclusive range (either bound may be omitted)
//!
//! Every condition must hold. Text that is not a JSON object counts as "no
//! conditions".

use serde_json::{Map, Value};

use seo_catalog::Entity;

/// One attribute predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Loose equality with a scalar.
    Equals(Value),
    /// Strict membership in a list.
    OneOf(Vec<Value>),
    /// Inclusive numeric range.
    Range { min: Option<f64>, max: Option<f64> },
}

impl Condition {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::OneOf(items),
            Value::Object(map) if map.contains_key("min") || map.contains_key("max") => Self::Range {
                min: map.get("min").and_then(bound),
                max: map.get("max").and_then(bound),
            },
            other => Self::Equals(other),
        }
    }

    /// Test an attribute value (`Null` when the entity lacks it).
    #[must_use]
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Self::Equals(expected) => loose_eq(actual, expected),
            Self::OneOf(allowed) => allowed.contains(actual),
            Self::Range { min, max } => {
                let number = to_number(actual);
                min.is_none_or(|min| number >= min) && max.is_none_or(|max| number <= max)
            }
        }
    }
}

/// A template's full condition set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conditions {
    rules: Vec<(String, Condition)>,
}

impl Conditions {
    /// Decode stored condition text.
    ///
    /// Missing, blank or malformed text yields an empty set, which every
    /// entity satisfies.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str::<Map<String, Value>>(raw) {
            Ok(map) => Self {
                rules: map
                    .into_iter()
                    .map(|(attribute, value)| (attribute, Condition::from_value(value)))
                    .collect(),
            },
            Err(e) => {
                tracing::debug!(error = %e, conditions = raw, "Ignoring malformed template conditions");
                Self::default()
            }
        }
    }

    /// Whether there are no conditions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `entity` satisfies every condition.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.rules.iter().all(|(attribute, condition)| {
            let actual = entity.attribute(attribute).unwrap_or(Value::Null);
            condition.matches(&actual)
        })
    }
}

fn bound(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(to_number(other)),
    }
}

/// Numeric reading of a value; anything non-numeric reads as 0.
fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Equality that converts between numbers, numeric strings and booleans.
fn loose_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(b), other) | (other, Value::Bool(b)) => *b == truthy(other),
        (Value::Null, other) | (other, Value::Null) => !truthy(other),
        _ => match (numeric(actual), numeric(expected)) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => match (actual, expected) {
                (Value::String(a), Value::String(b)) => a == b,
                _ => actual == expected,
            },
        },
    }
}
