//! Normalization of flexibly-shaped stored fields.
//!
//! List-valued columns (tags, features, capabilities, compatibility) were
//! written by several generations of submission forms: some rows hold real
//! JSON arrays, some a JSON-encoded array stored as a string, some a
//! comma-separated string. All reads funnel through [`normalize_list`] at
//! the row-to-domain boundary so call sites only ever see `Vec<String>`.

use serde_json::Value;

/// Coerce a stored field into a list of strings.
///
/// Arrays pass through unchanged; strings are parsed as JSON when they look
/// encoded, otherwise split on commas and trimmed; null and missing values
/// become the empty list.
pub fn normalize_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        Value::String(s) => normalize_string(s),
        Value::Null => Vec::new(),
        other => vec![value_to_string(other)],
    }
}

fn normalize_string(s: &str) -> Vec<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    // A string starting with '[' is almost certainly a JSON-encoded array
    if trimmed.starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
            return items.iter().map(value_to_string).collect();
        }
    }
    trimmed
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_passes_through() {
        assert_eq!(normalize_list(&json!(["x"])), vec!["x"]);
        assert_eq!(normalize_list(&json!(["a", "b"])), vec!["a", "b"]);
    }

    #[test]
    fn test_comma_separated_string_is_split_and_trimmed() {
        assert_eq!(normalize_list(&json!("a, b,c")), vec!["a", "b", "c"]);
        assert_eq!(normalize_list(&json!(" solo ")), vec!["solo"]);
    }

    #[test]
    fn test_json_encoded_string_is_parsed() {
        assert_eq!(
            normalize_list(&json!("[\"search\", \"files\"]")),
            vec!["search", "files"]
        );
    }

    #[test]
    fn test_malformed_encoded_string_falls_back_to_comma_split() {
        assert_eq!(normalize_list(&json!("[broken, json")), vec!["[broken", "json"]);
    }

    #[test]
    fn test_null_and_empty_become_empty_list() {
        assert!(normalize_list(&Value::Null).is_empty());
        assert!(normalize_list(&json!("")).is_empty());
        assert!(normalize_list(&json!("  ,  ,")).is_empty());
    }

    #[test]
    fn test_non_string_array_elements_are_stringified() {
        assert_eq!(normalize_list(&json!([1, "b"])), vec!["1", "b"]);
    }
}
