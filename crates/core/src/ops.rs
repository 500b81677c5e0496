//! The operation surface shared by every record type.

use imbl::OrdMap;

use crate::error::RecordError;
use crate::key::Key;
use crate::mutable::MutableRecord;
use crate::record::Record;
use crate::value::Value;

/// Persistent get/set/merge/update over a record.
///
/// Implementors only say how to view themselves as a [`Record`] and how to
/// wrap a record back up; every operation is provided. Operations that look
/// like mutations return a new value and never alter the receiver.
///
/// ## Missing keys
///
/// Record key sets are fixed by their template. `set`, `update`, `merge` and
/// the first step of `set_in` fail with [`RecordError::UnknownKey`] for keys
/// outside it. `delete` resets a field to its default instead of removing it.
pub trait RecordOps: Sized {
    fn record(&self) -> &Record;

    /// Wraps a record produced by editing `self.record()`. The record always
    /// has the same shape as the receiver.
    fn wrap(record: Record) -> Self;

    /// The record type's diagnostic name.
    fn descriptive_name(&self) -> &str {
        self.record().name()
    }

    // ── Single field ────────────────────────────────────────────────

    fn get(&self, key: &str) -> Option<&Value> {
        self.record().values().get(key)
    }

    fn get_or<'a>(&'a self, key: &str, fallback: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(fallback)
    }

    /// Whether `key` belongs to the record's template.
    fn has(&self, key: &str) -> bool {
        self.record().template().contains(key)
    }

    fn set(&self, key: &str, value: impl Into<Value>) -> Result<Self, RecordError> {
        self.with_mutations(|m| m.set(key, value).map(|_| ()))
    }

    fn delete(&self, key: &str) -> Result<Self, RecordError> {
        self.with_mutations(|m| m.delete(key).map(|_| ()))
    }

    fn clear(&self) -> Self {
        let mut edit = self.as_mutable();
        edit.clear();
        Self::wrap(edit.as_immutable())
    }

    fn update<F>(&self, key: &str, f: F) -> Result<Self, RecordError>
    where
        F: FnOnce(Value) -> Value,
    {
        self.with_mutations(|m| m.update(key, f).map(|_| ()))
    }

    // ── Key paths ───────────────────────────────────────────────────

    fn get_in(&self, path: &[Key]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.get(first.as_field()?)?;
        for key in rest {
            current = current.get_key(key)?;
        }
        Some(current)
    }

    fn has_in(&self, path: &[Key]) -> bool {
        self.get_in(path).is_some()
    }

    fn set_in(&self, path: &[Key], value: impl Into<Value>) -> Result<Self, RecordError> {
        self.with_mutations(|m| m.set_in(path, value).map(|_| ()))
    }

    fn delete_in(&self, path: &[Key]) -> Self {
        let mut edit = self.as_mutable();
        edit.delete_in(path);
        Self::wrap(edit.as_immutable())
    }

    fn update_in<F>(&self, path: &[Key], f: F) -> Result<Self, RecordError>
    where
        F: FnOnce(Value) -> Value,
    {
        self.with_mutations(|m| m.update_in(path, f).map(|_| ()))
    }

    // ── Merging ─────────────────────────────────────────────────────

    /// Shallow merge of a map or record into this record.
    fn merge(&self, source: &Value) -> Result<Self, RecordError> {
        self.with_mutations(|m| m.merge(source).map(|_| ()))
    }

    fn merge_with<F>(&self, source: &Value, conflict: F) -> Result<Self, RecordError>
    where
        F: FnMut(&Value, &Value, &str) -> Value,
    {
        self.with_mutations(|m| m.merge_with(source, conflict).map(|_| ()))
    }

    fn merge_deep(&self, source: &Value) -> Result<Self, RecordError> {
        self.with_mutations(|m| m.merge_deep(source).map(|_| ()))
    }

    fn merge_deep_with<F>(&self, source: &Value, conflict: F) -> Result<Self, RecordError>
    where
        F: FnMut(&Value, &Value, &str) -> Value,
    {
        self.with_mutations(|m| m.merge_deep_with(source, conflict).map(|_| ()))
    }

    // ── Batching ────────────────────────────────────────────────────

    fn as_mutable(&self) -> MutableRecord {
        self.record().as_mutable()
    }

    /// Runs a batch of edits and returns the single resulting value. If any
    /// edit fails the whole batch is discarded.
    fn with_mutations<F>(&self, f: F) -> Result<Self, RecordError>
    where
        F: FnOnce(&mut MutableRecord) -> Result<(), RecordError>,
    {
        let mut edit = self.as_mutable();
        f(&mut edit)?;
        Ok(Self::wrap(edit.as_immutable()))
    }

    // ── Conversion ──────────────────────────────────────────────────

    fn to_json(&self) -> serde_json::Value {
        self.record().to_json()
    }

    fn to_map(&self) -> OrdMap<String, Value> {
        self.record().to_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::RecordFactory;
    use crate::path;
    use crate::template::Template;
    use serde_json::json;

    fn address() -> RecordFactory {
        RecordFactory::new(
            Template::new().field("city", "").field("zip", ""),
            Some("Address"),
        )
    }

    fn person() -> Record {
        let factory = RecordFactory::new(
            Template::new()
                .field("name", "")
                .field("address", Value::Null)
                .field("tags", Value::from_json(&json!([])))
                .field("meta", Value::from_json(&json!({}))),
            Some("Person"),
        );
        let home = address()
            .create_from_json(&json!({"city": "Oslo", "zip": "0150"}))
            .unwrap();
        factory
            .default_record()
            .set("name", "Ann")
            .unwrap()
            .set("address", home)
            .unwrap()
            .set("tags", Value::from_json(&json!(["a", "b"])))
            .unwrap()
    }

    #[test]
    fn negative_index_addresses_nothing() {
        let ann = person();
        assert!(ann.has_in(&path!["tags", 1]));
        assert!(!ann.has_in(&path!["tags", -1]));
        assert_eq!(ann.delete_in(&path!["tags", -1]), ann);
    }

    #[test]
    fn set_leaves_receiver_untouched() {
        let ann = person();
        let bea = ann.set("name", "Bea").unwrap();
        assert_eq!(ann.get("name").and_then(Value::as_str), Some("Ann"));
        assert_eq!(bea.get("name").and_then(Value::as_str), Some("Bea"));
        assert_ne!(ann, bea);
    }

    #[test]
    fn set_unknown_key_fails() {
        let err = person().set("email", "ann@example.com").unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownKey {
                record: "Person".to_string(),
                key: "email".to_string(),
            }
        );
    }

    #[test]
    fn delete_resets_to_default() {
        let cleared = person().delete("name").unwrap();
        assert_eq!(cleared.get("name").and_then(Value::as_str), Some(""));
        assert!(cleared.has("name"));
        assert_eq!(cleared.len(), 4);
    }

    #[test]
    fn clear_resets_every_field() {
        let cleared = person().clear();
        assert_eq!(
            cleared.to_json(),
            json!({"name": "", "address": null, "tags": [], "meta": {}})
        );
    }

    #[test]
    fn get_or_falls_back_for_unknown_keys() {
        let fallback = Value::from("n/a");
        let p = person();
        assert_eq!(p.get_or("email", &fallback), &fallback);
        assert_eq!(p.get_or("name", &fallback).as_str(), Some("Ann"));
    }

    #[test]
    fn get_in_walks_records_and_lists() {
        let p = person();
        assert_eq!(
            p.get_in(&path!["address", "city"]).and_then(Value::as_str),
            Some("Oslo")
        );
        assert_eq!(
            p.get_in(&path!["tags", 1]).and_then(Value::as_str),
            Some("b")
        );
        assert!(p.get_in(&path!["tags", 5]).is_none());
        assert!(!p.has_in(&path!["address", "country"]));
    }

    #[test]
    fn set_in_rebuilds_nested_record() {
        let original = person();
        let moved = original.set_in(&path!["address", "city"], "Bergen").unwrap();
        assert_eq!(
            moved.get_in(&path!["address", "city"]).and_then(Value::as_str),
            Some("Bergen")
        );
        assert_eq!(
            original.get_in(&path!["address", "city"]).and_then(Value::as_str),
            Some("Oslo")
        );
        let address = moved.get("address").and_then(Value::as_record).unwrap();
        assert_eq!(address.name(), "Address");
    }

    #[test]
    fn set_in_unknown_nested_key_fails() {
        let err = person()
            .set_in(&path!["address", "country"], "NO")
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownKey {
                record: "Address".to_string(),
                key: "country".to_string(),
            }
        );
    }

    #[test]
    fn set_in_creates_missing_maps() {
        let p = person()
            .set_in(&path!["meta", "source", "system"], "crm")
            .unwrap();
        assert_eq!(
            p.get("meta").map(Value::to_json),
            Some(json!({"source": {"system": "crm"}}))
        );
    }

    #[test]
    fn set_in_appends_at_list_end_only() {
        let p = person().set_in(&path!["tags", 2], "c").unwrap();
        assert_eq!(
            p.get("tags").map(Value::to_json),
            Some(json!(["a", "b", "c"]))
        );

        let err = person().set_in(&path!["tags", 7], "z").unwrap_err();
        assert!(matches!(err, RecordError::InvalidPath { .. }));
    }

    #[test]
    fn set_in_through_scalar_fails() {
        let err = person().set_in(&path!["name", "first"], "A").unwrap_err();
        match err {
            RecordError::InvalidPath { reason, .. } => assert!(reason.contains("string")),
            other => panic!("expected InvalidPath, got {:?}", other),
        }
    }

    #[test]
    fn delete_in_removes_list_element_and_resets_fields() {
        let p = person();
        let fewer = p.delete_in(&path!["tags", 0]);
        assert_eq!(fewer.get("tags").map(Value::to_json), Some(json!(["b"])));

        let no_city = p.delete_in(&path!["address", "city"]);
        assert_eq!(
            no_city.get_in(&path!["address", "city"]).and_then(Value::as_str),
            Some("")
        );

        assert_eq!(p.delete_in(&path!["address", "nowhere", "deep"]), p);
    }

    #[test]
    fn update_in_sees_current_value() {
        let p = person()
            .update_in(&path!["address", "zip"], |zip| {
                Value::from(format!("NO-{}", zip.as_str().unwrap_or_default()))
            })
            .unwrap();
        assert_eq!(
            p.get_in(&path!["address", "zip"]).and_then(Value::as_str),
            Some("NO-0150")
        );
    }

    #[test]
    fn update_missing_value_starts_from_null() {
        let p = person()
            .update_in(&path!["meta", "visits"], |v| {
                assert!(v.is_null());
                Value::from(1)
            })
            .unwrap();
        assert_eq!(
            p.get_in(&path!["meta", "visits"]).and_then(Value::as_i64),
            Some(1)
        );
    }

    #[test]
    fn shallow_merge_replaces_nested_values() {
        let p = person()
            .merge(&Value::from_json(&json!({"address": {"city": "Bergen"}})))
            .unwrap();
        assert_eq!(
            p.get("address").map(Value::to_json),
            Some(json!({"city": "Bergen"}))
        );
        assert!(matches!(p.get("address"), Some(Value::Map(_))));
    }

    #[test]
    fn deep_merge_keeps_nested_record_type() {
        let p = person()
            .merge_deep(&Value::from_json(&json!({"address": {"city": "Bergen"}})))
            .unwrap();
        assert_eq!(
            p.get("address").map(Value::to_json),
            Some(json!({"city": "Bergen", "zip": "0150"}))
        );
        assert!(matches!(p.get("address"), Some(Value::Record(_))));
    }

    #[test]
    fn merge_with_resolves_conflicts() {
        let p = person()
            .merge_with(&Value::from_json(&json!({"name": "Smith"})), |prev, next, key| {
                assert_eq!(key, "name");
                Value::from(format!(
                    "{} {}",
                    prev.as_str().unwrap_or_default(),
                    next.as_str().unwrap_or_default()
                ))
            })
            .unwrap();
        assert_eq!(p.get("name").and_then(Value::as_str), Some("Ann Smith"));
    }

    #[test]
    fn merge_deep_with_reaches_nested_leaves() {
        let mut keys = Vec::new();
        let p = person()
            .merge_deep_with(
                &Value::from_json(&json!({"address": {"zip": "5003"}})),
                |prev, next, key| {
                    keys.push(key.to_string());
                    if prev.as_str() == Some("0150") {
                        prev.clone()
                    } else {
                        next.clone()
                    }
                },
            )
            .unwrap();
        assert_eq!(keys, vec!["zip".to_string()]);
        assert_eq!(
            p.get_in(&path!["address", "zip"]).and_then(Value::as_str),
            Some("0150")
        );
    }

    #[test]
    fn merge_unknown_key_fails_without_partial_result() {
        let original = person();
        let err = original
            .merge(&Value::from_json(&json!({"name": "Bea", "email": "x"})))
            .unwrap_err();
        assert!(matches!(err, RecordError::UnknownKey { .. }));
        assert_eq!(original.get("name").and_then(Value::as_str), Some("Ann"));
    }

    #[test]
    fn merge_from_another_record() {
        let a = address().create_from_json(&json!({"city": "Oslo"})).unwrap();
        let b = address().create_from_json(&json!({"zip": "0150"})).unwrap();
        let merged = a.merge(&Value::Record(b.clone())).unwrap();
        assert_eq!(merged, b);
    }

    #[test]
    fn with_mutations_is_all_or_nothing() {
        let p = person();
        let result = p.with_mutations(|m| {
            m.set("name", "Bea")?;
            m.set("email", "bea@example.com")?;
            Ok(())
        });
        assert!(result.is_err());

        let renamed = p
            .with_mutations(|m| {
                m.set("name", "Bea")?.set_in(&path!["address", "zip"], "5003")?;
                Ok(())
            })
            .unwrap();
        assert_eq!(
            renamed.to_json(),
            json!({
                "name": "Bea",
                "address": {"city": "Oslo", "zip": "5003"},
                "tags": ["a", "b"],
                "meta": {}
            })
        );
    }
}
