//! JSON helpers shared by the JSON tools.

use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};

use crate::{Result, ToolkitError};

/// Parse tool input, mapping parser errors to [`ToolkitError::InvalidJson`].
pub fn parse(input: &str) -> Result<Value> {
    serde_json::from_str::<Value>(input).map_err(|e| ToolkitError::InvalidJson(e.to_string()))
}

/// Pretty-print with `indent` spaces per level.
pub fn to_pretty(
    value: &Value,
    indent: usize,
) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Recursively sort object keys.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = parse("{bad json").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid JSON: "));
        assert!(message.contains("line 1"));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse("   "), Err(ToolkitError::InvalidJson(_))));
    }

    #[test]
    fn test_to_pretty_indent() {
        let value = json!({ "a": [1, 2] });
        assert_eq!(to_pretty(&value, 4).unwrap(), "{\n    \"a\": [\n        1,\n        2\n    ]\n}");
    }

    #[test]
    fn test_to_pretty_empty_containers() {
        assert_eq!(to_pretty(&json!({ "a": {}, "b": [] }), 2).unwrap(), "{\n  \"a\": {},\n  \"b\": []\n}");
    }

    #[test]
    fn test_sort_keys_nested() {
        let value = parse(r#"{"b": {"z": 1, "y": 2}, "a": [{"d": 1, "c": 2}]}"#).unwrap();
        let sorted = serde_json::to_string(&sort_keys(value)).unwrap();
        assert_eq!(sorted, r#"{"a":[{"c":2,"d":1}],"b":{"y":2,"z":1}}"#);
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let value = parse(r#"{"z": 1, "a": 2}"#).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
