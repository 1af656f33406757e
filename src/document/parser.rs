//! JSON parsing into tree values.
//!
//! Parsing is delegated to `serde_json` built with `preserve_order`, so object
//! keys come out in the order they appear in the source text. That order is
//! what branch enumeration and export report.
//!
//! # Example
//!
//! ```
//! use jsontree::document::parser::parse_json;
//!
//! let value = parse_json(r#"{"world": {"region1": {"pop": 100}}}"#).unwrap();
//! assert!(value.is_object());
//! ```

use super::node::JsonValue;
use anyhow::{Context, Result};
use serde_json::Value as SerdeValue;

/// Parses JSON text into a [`JsonValue`].
///
/// # Errors
///
/// Returns an error if the text is not valid JSON.
pub fn parse_json(content: &str) -> Result<JsonValue> {
    let value: SerdeValue = serde_json::from_str(content).context("Invalid JSON")?;
    Ok(parse_value(value))
}

/// Converts an already-parsed `serde_json::Value` into a [`JsonValue`].
pub fn parse_value(value: SerdeValue) -> JsonValue {
    JsonValue::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::JsonNumber;

    #[test]
    fn test_parse_nested_object() {
        let value = parse_json(r#"{"world": {"region1": {"city1": {"pop": 100}}}}"#).unwrap();
        let world = value.as_object().unwrap().get("world").unwrap();
        let region = world.as_object().unwrap().get("region1").unwrap();
        let city = region.as_object().unwrap().get("city1").unwrap();
        assert_eq!(
            city.as_object().unwrap().get("pop"),
            Some(&JsonValue::Number(JsonNumber::Integer(100)))
        );
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_json("null").unwrap(), JsonValue::Null);
        assert_eq!(parse_json("true").unwrap(), JsonValue::Boolean(true));
        assert_eq!(parse_json("\"hi\"").unwrap(), JsonValue::from("hi"));
        assert_eq!(
            parse_json("1.5").unwrap(),
            JsonValue::Number(JsonNumber::Float(1.5))
        );
    }

    #[test]
    fn test_parse_keeps_source_key_order() {
        let value = parse_json(r#"{"b": 1, "a": 2, "c": {"z": 1, "y": 2}}"#).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_json("{invalid json}");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid JSON"));
    }
}
