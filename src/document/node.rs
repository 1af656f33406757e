//! JSON value representation for tree documents.
//!
//! This module provides the core data structure for representing the nested,
//! JSON-like data held by a [`JsonTree`](super::tree::JsonTree). Objects keep
//! their keys in insertion order, which makes branch enumeration and export
//! reproducible for a given tree state.
//!
//! Only objects are walkable. Arrays and scalars are leaf data attached to a
//! branch node and are never traversed by a tree path.
//!
//! # Example
//!
//! ```
//! use jsontree::document::node::{JsonNumber, JsonValue};
//! use indexmap::IndexMap;
//!
//! let mut city = IndexMap::new();
//! city.insert("pop".to_string(), JsonValue::Number(JsonNumber::Integer(100)));
//! let city = JsonValue::Object(city);
//!
//! assert!(city.is_object());
//! assert!(!JsonValue::Array(vec![]).is_object());
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as SerdeValue;

/// Key/value pairs of an object, in insertion order.
pub type Object = IndexMap<String, JsonValue>;

/// Represents JSON numbers (integer or float)
///
/// Integers above `i64::MAX` keep their exact digits as `Unsigned`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonNumber {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

impl std::fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonNumber::Integer(i) => write!(f, "{}", i),
            JsonNumber::Unsigned(u) => write!(f, "{}", u),
            // serde_json keeps the fractional marker ("1.0") and maps
            // non-finite values to null the way JSON.stringify does
            JsonNumber::Float(fl) => match serde_json::Number::from_f64(*fl) {
                Some(n) => write!(f, "{}", n),
                None => write!(f, "null"),
            },
        }
    }
}

impl JsonNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            JsonNumber::Integer(i) => *i as f64,
            JsonNumber::Unsigned(u) => *u as f64,
            JsonNumber::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, JsonNumber::Integer(_) | JsonNumber::Unsigned(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, JsonNumber::Float(_))
    }
}

/// A JSON value.
///
/// Objects are the branch nodes of a tree; every other variant is leaf data.
/// Serialization goes through `serde_json::Value`, so a `JsonValue` can be
/// embedded in any serde-derived structure such as an export record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SerdeValue", into = "SerdeValue")]
pub enum JsonValue {
    /// A JSON object containing key-value pairs
    Object(Object),
    /// A JSON array containing ordered values
    Array(Vec<JsonValue>),
    /// A JSON string
    String(String),
    /// A JSON number (integer or float)
    Number(JsonNumber),
    /// A JSON boolean
    Boolean(bool),
    /// A JSON null value
    Null,
}

impl JsonValue {
    /// Returns true if this value is an object, i.e. a branch node.
    ///
    /// This is the single predicate used wherever the tree decides whether a
    /// value can be walked into.
    ///
    /// # Example
    ///
    /// ```
    /// use jsontree::document::node::{JsonNumber, JsonValue};
    /// use indexmap::IndexMap;
    ///
    /// let obj = JsonValue::Object(IndexMap::new());
    /// assert!(obj.is_object());
    ///
    /// let num = JsonValue::Number(JsonNumber::Integer(42));
    /// assert!(!num.is_object());
    /// ```
    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// Returns true if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// Returns true if this value is a container (object or array).
    pub fn is_container(&self) -> bool {
        matches!(self, JsonValue::Object(_) | JsonValue::Array(_))
    }

    /// Returns the entries if this value is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            JsonValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the entries mutably if this value is an object.
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            JsonValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Human-readable name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Object(_) => "object",
            JsonValue::Array(_) => "array",
            JsonValue::String(_) => "string",
            JsonValue::Number(_) => "number",
            JsonValue::Boolean(_) => "boolean",
            JsonValue::Null => "null",
        }
    }
}

impl From<SerdeValue> for JsonValue {
    fn from(value: SerdeValue) -> Self {
        match value {
            SerdeValue::Null => JsonValue::Null,
            SerdeValue::Bool(b) => JsonValue::Boolean(b),
            SerdeValue::Number(n) => {
                let number = if let Some(i) = n.as_i64() {
                    JsonNumber::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    JsonNumber::Unsigned(u)
                } else {
                    JsonNumber::Float(n.as_f64().unwrap_or(f64::NAN))
                };
                JsonValue::Number(number)
            }
            SerdeValue::String(s) => JsonValue::String(s),
            SerdeValue::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            SerdeValue::Object(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, JsonValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for SerdeValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => SerdeValue::Null,
            JsonValue::Boolean(b) => SerdeValue::Bool(b),
            JsonValue::Number(JsonNumber::Integer(i)) => SerdeValue::from(i),
            JsonValue::Number(JsonNumber::Unsigned(u)) => SerdeValue::from(u),
            JsonValue::Number(JsonNumber::Float(f)) => serde_json::Number::from_f64(f)
                .map(SerdeValue::Number)
                .unwrap_or(SerdeValue::Null),
            JsonValue::String(s) => SerdeValue::String(s),
            JsonValue::Array(items) => {
                SerdeValue::Array(items.into_iter().map(SerdeValue::from).collect())
            }
            JsonValue::Object(entries) => SerdeValue::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, SerdeValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Object> for JsonValue {
    fn from(entries: Object) -> Self {
        JsonValue::Object(entries)
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<i64> for JsonValue {
    fn from(i: i64) -> Self {
        JsonValue::Number(JsonNumber::Integer(i))
    }
}

impl From<f64> for JsonValue {
    fn from(f: f64) -> Self {
        JsonValue::Number(JsonNumber::Float(f))
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_number_display() {
        let int = JsonNumber::Integer(42);
        assert_eq!(format!("{}", int), "42");

        let float = JsonNumber::Float(42.5);
        assert_eq!(format!("{}", float), "42.5");

        let whole = JsonNumber::Float(1.0);
        assert_eq!(format!("{}", whole), "1.0");

        let nan = JsonNumber::Float(f64::NAN);
        assert_eq!(format!("{}", nan), "null");
    }

    #[test]
    fn test_json_number_type_checks() {
        let int = JsonNumber::Integer(42);
        assert!(int.is_integer());
        assert!(!int.is_float());

        let float = JsonNumber::Float(42.0);
        assert!(float.is_float());
        assert!(!float.is_integer());
        assert_eq!(float.as_f64(), 42.0);
    }

    #[test]
    fn test_only_objects_are_branches() {
        assert!(JsonValue::Object(Object::new()).is_object());
        assert!(!JsonValue::Array(vec![]).is_object());
        assert!(!JsonValue::String("x".to_string()).is_object());
        assert!(!JsonValue::Null.is_object());
        assert!(JsonValue::Array(vec![]).is_container());
    }

    #[test]
    fn test_from_serde_preserves_key_order() {
        let value = JsonValue::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_from_serde_number_kinds() {
        assert_eq!(
            JsonValue::from(json!(7)),
            JsonValue::Number(JsonNumber::Integer(7))
        );
        assert_eq!(
            JsonValue::from(json!(2.5)),
            JsonValue::Number(JsonNumber::Float(2.5))
        );
    }

    #[test]
    fn test_large_unsigned_keeps_digits() {
        let value = JsonValue::from(json!(18446744073709551615u64));
        assert_eq!(
            value,
            JsonValue::Number(JsonNumber::Unsigned(u64::MAX))
        );
        assert_eq!(format!("{}", JsonNumber::Unsigned(u64::MAX)), "18446744073709551615");
        assert!(JsonNumber::Unsigned(u64::MAX).is_integer());

        let back: SerdeValue = value.into();
        assert_eq!(back.to_string(), "18446744073709551615");
    }

    #[test]
    fn test_into_serde() {
        let value = JsonValue::from(json!({"a": [1, "two", null, true]}));
        let back: SerdeValue = value.into();
        assert_eq!(back, json!({"a": [1, "two", null, true]}));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(JsonValue::Null.type_name(), "null");
        assert_eq!(JsonValue::from(3i64).type_name(), "number");
        assert_eq!(JsonValue::from("s").type_name(), "string");
    }
}
