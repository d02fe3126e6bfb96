//! Diff generation for audit logging
//!
//! Computes field-level differences between two entity snapshots. The
//! resulting [`AuditDiff`] keeps both whole snapshots so history can be
//! reconstructed, and highlights only the top-level fields that changed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entry::Action;
use super::snapshot::normalize;

/// Default truncation length for strings in human-readable summaries
pub const DEFAULT_SUMMARY_MAX_LEN: usize = 50;

/// Old and new value of a single changed field
///
/// A side where the field does not exist is represented as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub before: Value,
    pub after: Value,
}

/// The before/after/changes triple computed between two snapshots
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditDiff {
    /// Whole snapshot before the mutation (`None` for creates)
    pub before: Option<Value>,

    /// Whole snapshot after the mutation (`None` for deletes)
    pub after: Option<Value>,

    /// Only the fields whose values differ, keyed by field name
    #[serde(default)]
    pub changes: BTreeMap<String, FieldChange>,
}

/// Build a diff between two entity states
///
/// Both sides are normalized first, so anything serializable can be passed
/// in; values that cannot be represented as JSON count as absent.
pub fn build_diff<B, A>(before: Option<&B>, after: Option<&A>) -> AuditDiff
where
    B: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    diff_snapshots(normalize(before), normalize(after))
}

/// Build a diff between two already-normalized snapshots
///
/// Snapshots that are not objects contribute no fields, but are still kept
/// whole in the result.
pub fn diff_snapshots(before: Option<Value>, after: Option<Value>) -> AuditDiff {
    let mut changes = BTreeMap::new();

    {
        let before_fields = fields_of(before.as_ref());
        let after_fields = fields_of(after.as_ref());

        let keys = before_fields
            .into_iter()
            .flat_map(|m| m.keys())
            .chain(after_fields.into_iter().flat_map(|m| m.keys()));

        for key in keys {
            if changes.contains_key(key) {
                continue;
            }

            let old = before_fields.and_then(|m| m.get(key)).unwrap_or(&Value::Null);
            let new = after_fields.and_then(|m| m.get(key)).unwrap_or(&Value::Null);

            if !values_equal(old, new) {
                changes.insert(
                    key.clone(),
                    FieldChange {
                        before: old.clone(),
                        after: new.clone(),
                    },
                );
            }
        }
    }

    AuditDiff {
        before,
        after,
        changes,
    }
}

/// Structural, value-based equality between two JSON values
///
/// Objects are compared independent of key order and numbers by numeric
/// value, so `1` and `1.0` are equal. Two integers compare exactly.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            if x.is_f64() || y.is_f64() {
                matches!((x.as_f64(), y.as_f64()), (Some(p), Some(q)) if p == q)
            } else {
                x == y
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| values_equal(p, q))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => false,
    }
}

fn fields_of(snapshot: Option<&Value>) -> Option<&Map<String, Value>> {
    snapshot.and_then(Value::as_object)
}

impl AuditDiff {
    /// True when no field changed
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Names of the changed fields, in sorted order
    pub fn changed_fields(&self) -> Vec<&str> {
        self.changes.keys().map(String::as_str).collect()
    }

    /// The mutation kind implied by which snapshots exist
    pub fn inferred_action(&self) -> Option<Action> {
        match (&self.before, &self.after) {
            (None, Some(_)) => Some(Action::Create),
            (Some(_), None) => Some(Action::Delete),
            (Some(_), Some(_)) => Some(Action::Update),
            (None, None) => None,
        }
    }

    /// Human-readable one-line summary of the changes
    ///
    /// Returns `None` when nothing changed.
    pub fn summary(&self) -> Option<String> {
        self.summary_with_limit(DEFAULT_SUMMARY_MAX_LEN)
    }

    /// Like [`AuditDiff::summary`], truncating strings longer than `max_len`
    pub fn summary_with_limit(&self, max_len: usize) -> Option<String> {
        if self.changes.is_empty() {
            return None;
        }

        let before_fields = fields_of(self.before.as_ref());
        let after_fields = fields_of(self.after.as_ref());

        let parts: Vec<String> = self
            .changes
            .iter()
            .map(|(key, change)| {
                let had = before_fields.is_some_and(|m| m.contains_key(key));
                let has = after_fields.is_some_and(|m| m.contains_key(key));

                let old = if had {
                    format_value(&change.before, max_len)
                } else {
                    "(added)".to_string()
                };
                let new = if has {
                    format_value(&change.after, max_len)
                } else {
                    "(removed)".to_string()
                };

                format!("{}: {} -> {}", key, old, new)
            })
            .collect();

        Some(parts.join(", "))
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value, max_len: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > max_len {
                let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
                format!("\"{}...\"", kept)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diff(before: Value, after: Value) -> AuditDiff {
        build_diff(Some(&before), Some(&after))
    }

    #[test]
    fn test_simple_field_change() {
        let result = diff(json!({"title": "A", "views": 1}), json!({"title": "A", "views": 2}));

        assert_eq!(result.before, Some(json!({"title": "A", "views": 1})));
        assert_eq!(result.after, Some(json!({"title": "A", "views": 2})));
        assert_eq!(result.changes.len(), 1);
        assert_eq!(
            result.changes["views"],
            FieldChange {
                before: json!(1),
                after: json!(2)
            }
        );
    }

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let post = json!({"title": "A", "tags": ["rust", "web"], "meta": {"seo": true}});
        let result = diff(post.clone(), post);
        assert!(result.is_empty());
        assert!(result.summary().is_none());
    }

    #[test]
    fn test_null_against_null() {
        let result = build_diff::<Value, Value>(None, None);
        assert_eq!(result, AuditDiff::default());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"before": null, "after": null, "changes": {}})
        );
    }

    #[test]
    fn test_create_lists_every_field() {
        let after = json!({"name": "X", "url": "https://example.com"});
        let result = build_diff::<Value, Value>(None, Some(&after));

        assert_eq!(result.changed_fields(), vec!["name", "url"]);
        assert_eq!(result.changes["name"].before, Value::Null);
        assert_eq!(result.changes["name"].after, json!("X"));
        assert_eq!(result.inferred_action(), Some(Action::Create));
    }

    #[test]
    fn test_delete_lists_every_field() {
        let before = json!({"name": "X", "order": 4});
        let result = build_diff::<Value, Value>(Some(&before), None);

        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.changes["order"].before, json!(4));
        assert_eq!(result.changes["order"].after, Value::Null);
        assert_eq!(result.inferred_action(), Some(Action::Delete));
    }

    #[test]
    fn test_field_added_and_removed() {
        let result = diff(json!({"a": 1, "old": "x"}), json!({"a": 1, "new": "y"}));

        assert_eq!(result.changed_fields(), vec!["new", "old"]);
        assert_eq!(result.changes["old"].after, Value::Null);
        assert_eq!(result.changes["new"].before, Value::Null);
    }

    #[test]
    fn test_explicit_null_equals_missing_field() {
        let result = diff(json!({"a": 1, "cover": null}), json!({"a": 1}));
        assert!(result.is_empty());
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let before: Value =
            serde_json::from_str(r#"{"meta": {"x": 1, "y": 2}, "title": "A"}"#).unwrap();
        let after: Value =
            serde_json::from_str(r#"{"title": "A", "meta": {"y": 2, "x": 1}}"#).unwrap();

        assert!(diff(before, after).is_empty());
    }

    #[test]
    fn test_integer_and_float_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!(1.5)));
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let big = json!(9007199254740993u64);
        let near = json!(9007199254740992u64);
        assert!(!values_equal(&big, &near));
        assert!(values_equal(&big, &json!(9007199254740993u64)));
        assert!(!values_equal(&json!(-9007199254740993i64), &json!(-9007199254740992i64)));

        let diff = build_diff(Some(&json!({"id": big})), Some(&json!({"id": near})));
        assert_eq!(diff.changed_fields(), vec!["id"]);
    }

    #[test]
    fn test_array_order_matters() {
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!values_equal(&json!([1]), &json!([1, 1])));
    }

    #[test]
    fn test_nested_change_reported_at_top_level() {
        let result = diff(
            json!({"settings": {"footer": {"email": "a@x.dev"}}}),
            json!({"settings": {"footer": {"email": "b@x.dev"}}}),
        );
        assert_eq!(result.changed_fields(), vec!["settings"]);
    }

    #[test]
    fn test_non_object_snapshots_are_kept_whole() {
        let result = diff(json!([1, 2, 3]), json!("scalar"));
        assert!(result.is_empty());
        assert_eq!(result.before, Some(json!([1, 2, 3])));
        assert_eq!(result.after, Some(json!("scalar")));
    }

    #[test]
    fn test_non_object_against_object() {
        let result = diff(json!(42), json!({"name": "X"}));
        assert_eq!(result.changed_fields(), vec!["name"]);
    }

    #[test]
    fn test_inferred_action() {
        assert_eq!(diff(json!({}), json!({})).inferred_action(), Some(Action::Update));
        assert_eq!(AuditDiff::default().inferred_action(), None);
    }

    #[test]
    fn test_summary() {
        let result = diff(
            json!({"title": "Old", "active": true, "tags": [1, 2, 3], "gone": 1}),
            json!({"title": "New", "active": false, "tags": [1], "fresh": {"a": 1}}),
        );

        let summary = result.summary().unwrap();
        assert!(summary.contains("title: \"Old\" -> \"New\""));
        assert!(summary.contains("active: true -> false"));
        assert!(summary.contains("tags: [3 items] -> [1 items]"));
        assert!(summary.contains("gone: 1 -> (removed)"));
        assert!(summary.contains("fresh: (added) -> {1 fields}"));
    }

    #[test]
    fn test_summary_truncates_on_char_boundary() {
        let long = "é".repeat(80);
        let result = diff(json!({"body": long}), json!({"body": "short"}));

        let summary = result.summary().unwrap();
        assert!(summary.contains(&format!("\"{}...\"", "é".repeat(47))));
    }

    #[test]
    fn test_unserializable_side_counts_as_absent() {
        use std::collections::HashMap;

        let mut broken: HashMap<(u8, u8), u8> = HashMap::new();
        broken.insert((0, 0), 1);

        let after = json!({"name": "X"});
        let result = build_diff(Some(&broken), Some(&after));
        assert_eq!(result.before, None);
        assert_eq!(result.inferred_action(), Some(Action::Create));
    }
}
