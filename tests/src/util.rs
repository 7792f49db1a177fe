//! # Test Utilities
//!
//! Snapshot flattening for assertions on published identity state. A snapshot
//! like `{"identityMap": {"GAID": [{"id": "x"}]}}` flattens to
//! `{"identityMap.GAID[0].id": "x"}` so tests can assert single keys without
//! destructuring the whole tree.

use serde_json::Value;
use std::collections::BTreeMap;

/// Flatten a JSON value into dotted-path keys.
///
/// Objects join with `.`, array elements append `[index]`, and scalar leaves
/// become string values.
#[must_use]
pub fn flatten_map(value: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into("", value, &mut out);
    out
}

fn flatten_into(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(&path, child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(&format!("{prefix}[{index}]"), child, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_identity_snapshot() {
        let snapshot = json!({
            "identityMap": {
                "ECID": [{"id": "1234", "authenticatedState": "ambiguous", "primary": false}],
                "userId": [{"id": "u1"}, {"id": "u2"}],
            }
        });

        let flat = flatten_map(&snapshot);
        assert_eq!(flat["identityMap.ECID[0].id"], "1234");
        assert_eq!(flat["identityMap.ECID[0].primary"], "false");
        assert_eq!(flat["identityMap.userId[1].id"], "u2");
    }

    #[test]
    fn test_flatten_empty_object() {
        assert!(flatten_map(&json!({})).is_empty());
    }
}
