//! Snapshot normalization
//!
//! Converts whatever a mutation endpoint hands us into a canonical JSON
//! value that the diff builder can compare. Normalization never fails: a
//! value that cannot be represented as JSON is treated as absent.

use serde::Serialize;
use serde_json::Value;

/// Normalize an entity snapshot into plain JSON data
///
/// Returns `None` when the input is absent, serializes to `null`, or cannot
/// be serialized at all.
pub fn normalize<T>(value: Option<&T>) -> Option<Value>
where
    T: Serialize + ?Sized,
{
    let value = value?;

    match serde_json::to_value(value) {
        Ok(json) => normalize_value(json),
        Err(e) => {
            tracing::debug!(error = %e, "snapshot is not JSON-representable, treating as absent");
            None
        }
    }
}

/// Normalize an already-parsed JSON value
///
/// Only a top-level `null` maps to `None`; nested nulls are kept.
pub fn normalize_value(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Post {
        title: String,
        views: u32,
        draft: Option<bool>,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize"))
        }
    }

    #[test]
    fn test_absent_is_none() {
        assert_eq!(normalize::<Value>(None), None);
    }

    #[test]
    fn test_null_is_none() {
        assert_eq!(normalize(Some(&Value::Null)), None);
        assert_eq!(normalize::<Option<u32>>(Some(&None)), None);
    }

    #[test]
    fn test_struct_becomes_object() {
        let post = Post {
            title: "Hello".into(),
            views: 3,
            draft: None,
        };

        let snapshot = normalize(Some(&post)).unwrap();
        assert_eq!(snapshot, json!({"title": "Hello", "views": 3, "draft": null}));
    }

    #[test]
    fn test_serialization_failure_is_none() {
        assert_eq!(normalize(Some(&Unserializable)), None);
    }

    #[test]
    fn test_non_string_map_keys_fail_closed() {
        let mut map: HashMap<(u8, u8), &str> = HashMap::new();
        map.insert((1, 2), "pair");
        assert_eq!(normalize(Some(&map)), None);
    }

    #[test]
    fn test_nested_null_preserved() {
        let snapshot = normalize_value(json!({"cover": null})).unwrap();
        assert_eq!(snapshot["cover"], Value::Null);
    }

    #[test]
    fn test_scalar_kept() {
        assert_eq!(normalize(Some("plain")), Some(json!("plain")));
        assert_eq!(normalize(Some(&[1, 2])), Some(json!([1, 2])));
    }
}
