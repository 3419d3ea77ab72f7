//! Cache key construction.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

// == Generate Key ==
/// Builds a cache key from a prefix and a parameter map.
///
/// Parameters are ordered by name before serialization, so two maps holding
/// the same pairs always produce the same key regardless of how they were
/// built.
///
/// ```
/// use rental_edge::cache::generate_key;
/// use serde_json::json;
///
/// let a = json!({"b": 2, "a": 1});
/// let b = json!({"a": 1, "b": 2});
/// assert_eq!(
///     generate_key("p", a.as_object().unwrap()),
///     generate_key("p", b.as_object().unwrap()),
/// );
/// ```
pub fn generate_key(prefix: &str, params: &Map<String, Value>) -> String {
    let sorted: BTreeMap<&str, &Value> = params.iter().map(|(k, v)| (k.as_str(), v)).collect();

    // A BTreeMap of strings to JSON values always serializes
    let encoded = serde_json::to_string(&sorted).unwrap_or_default();
    format!("{}:{}", prefix, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_key_includes_prefix_and_params() {
        let key = generate_key("equipment", &object(json!({"category": "tents", "page": 2})));
        assert_eq!(key, r#"equipment:{"category":"tents","page":2}"#);
    }

    #[test]
    fn test_empty_params() {
        assert_eq!(generate_key("reviews", &Map::new()), "reviews:{}");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut first = Map::new();
        first.insert("b".into(), json!(2));
        first.insert("a".into(), json!(1));

        let mut second = Map::new();
        second.insert("a".into(), json!(1));
        second.insert("b".into(), json!(2));

        assert_eq!(generate_key("p", &first), generate_key("p", &second));
    }

    #[test]
    fn test_different_values_give_different_keys() {
        let a = generate_key("p", &object(json!({"a": 1})));
        let b = generate_key("p", &object(json!({"a": 2})));
        assert_ne!(a, b);
    }
}
