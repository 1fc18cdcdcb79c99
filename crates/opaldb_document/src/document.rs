//! The document value type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The structural kind of a JSON value.
///
/// Used to report what a parameter actually contained when it does not
/// match the kind an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A keyed document (JSON object).
    Document,
    /// An array.
    Array,
    /// A text string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Bool,
    /// Null.
    Null,
}

impl ValueKind {
    /// Returns the kind of the given value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => ValueKind::Document,
            Value::Array(_) => ValueKind::Array,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Null => ValueKind::Null,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ValueKind::Document => "a document",
            ValueKind::Array => "an array",
            ValueKind::String => "a string",
            ValueKind::Number => "a number",
            ValueKind::Bool => "a boolean",
            ValueKind::Null => "null",
        };
        f.write_str(s)
    }
}

/// A keyed document value.
///
/// Wraps a JSON object and guarantees, by construction, that the top-level
/// value is a document. Key order is preserved by `serde_json`'s map type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Converts a parsed value into a document, or reports its actual kind.
    pub fn from_value(value: Value) -> Result<Self, ValueKind> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ValueKind::of(&other)),
        }
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a value under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the document, returning the underlying JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Encodes the document as JSON text.
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_of_values() {
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Document);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!(7)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert_eq!(Document::from_value(json!([])), Err(ValueKind::Array));
        assert_eq!(Document::from_value(json!(1)), Err(ValueKind::Number));
        assert!(Document::from_value(json!({"a": 1})).is_ok());
    }

    #[test]
    fn insert_and_get() {
        let mut doc = Document::new();
        assert!(doc.is_empty());

        doc.insert("hello", json!("world"));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("hello"), Some(&json!("world")));
        assert_eq!(doc.get("missing"), None);
    }

    #[test]
    fn json_round_trip() {
        let mut doc = Document::new();
        doc.insert("n", json!(42));
        doc.insert("nested", json!({"a": [1, 2]}));

        let text = doc.to_json();
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn deserialize_rejects_arrays() {
        let result: Result<Document, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }
}
