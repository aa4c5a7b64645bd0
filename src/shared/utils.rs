//! Utility functions and helpers

use serde_json::{Map, Value};

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Rebuild `value` with every object's keys in ascending order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Key-sorted, whitespace-free JSON text
pub fn canonical_json(value: &Value) -> String {
    canonicalize(value).to_string()
}

/// Format a decimal amount for log output
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.6}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let value = json!({ "b": 1, "a": { "z": [ { "y": 2, "x": 1 } ], "c": null } });
        assert_eq!(canonical_json(&value), r#"{"a":{"c":null,"z":[{"x":1,"y":2}]},"b":1}"#);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(0.0000001), "0");
    }
}
