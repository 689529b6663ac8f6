//! Table rows
//!
//! A row is an ordered mapping from field name to JSON value. Field order is
//! the order in which the source object enumerated its keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Field used as the rendering key when present.
pub const ID_FIELD: &str = "id";

/// A single record displayed as a table line item
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a row from a JSON value. Non-object values are rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Builder-style insert, keeps insertion order
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `id` field, if the row carries one.
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD).filter(|v| !v.is_null())
    }

    /// Rendering key: the `id` value, or the row position when absent.
    ///
    /// Positions are not stable across sorting or filtering.
    pub fn key_at(&self, position: usize) -> String {
        match self.id() {
            Some(id) => display_value(id).into_owned(),
            None => position.to_string(),
        }
    }

    /// Cell text for `key`. Missing fields render as an empty string.
    pub fn display(&self, key: &str) -> Cow<'_, str> {
        match self.0.get(key) {
            Some(value) => display_value(value),
            None => Cow::Borrowed(""),
        }
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Whether a value takes part in search matching.
///
/// Only strings, numbers and booleans do; null, arrays and objects are skipped.
pub fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// Text form of a value as shown in a cell or an export.
pub fn display_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(format_number(n)),
        other => Cow::Owned(other.to_string()),
    }
}

/// Integral floats print without a fractional part (`2.0` -> `2`).
fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_keeps_source_key_order() {
        let row = Row::from_value(json!({"zeta": 1, "alfa": 2, "mid": 3})).expect("object");
        let keys: Vec<_> = row.keys().collect();
        assert_eq!(keys, vec!["zeta", "alfa", "mid"]);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Row::from_value(json!([1, 2])).is_none());
        assert!(Row::from_value(json!("x")).is_none());
    }

    #[test]
    fn test_display_values() {
        let row = Row::new()
            .with("n", 2.0)
            .with("f", 2.5)
            .with("b", true)
            .with("s", "hola")
            .with("z", Value::Null)
            .with("o", json!({"name": "Ana"}));
        assert_eq!(row.display("n"), "2");
        assert_eq!(row.display("f"), "2.5");
        assert_eq!(row.display("b"), "true");
        assert_eq!(row.display("s"), "hola");
        assert_eq!(row.display("z"), "");
        assert_eq!(row.display("missing"), "");
        assert_eq!(row.display("o"), r#"{"name":"Ana"}"#);
    }

    #[test]
    fn test_key_falls_back_to_position() {
        assert_eq!(Row::new().with("id", 7).key_at(3), "7");
        assert_eq!(Row::new().with("nombre", "A").key_at(3), "3");
        assert_eq!(Row::new().with("id", Value::Null).key_at(1), "1");
    }
}
