//! Deep-merge rules shared by records and plain maps.

use imbl::OrdMap;

use crate::error::RecordError;
use crate::value::Value;

/// Conflict resolver: `(previous, next, key) -> merged`.
pub(crate) type Conflict<'a> = dyn FnMut(&Value, &Value, &str) -> Value + 'a;

/// The entries a merge source contributes. `Null` contributes nothing; maps
/// and records contribute their fields; anything else is rejected on behalf
/// of `target`.
pub(crate) fn source_entries(
    source: &Value,
    target: &str,
) -> Result<OrdMap<String, Value>, RecordError> {
    match source {
        Value::Null => Ok(OrdMap::new()),
        Value::Map(map) => Ok(map.clone()),
        Value::Record(record) => Ok(record.values().clone()),
        other => Err(RecordError::NotAnObject {
            record: target.to_string(),
            found: other.type_name(),
        }),
    }
}

/// Merges `next` into `prev` recursively.
///
/// Keyed containers merge field by field (records still reject keys outside
/// their template). Lists merge position by position, extra elements of
/// `next` are appended. Every other pairing is a leaf conflict, settled by
/// `conflict`.
pub(crate) fn deep_merge(
    prev: &Value,
    next: &Value,
    key: &str,
    conflict: &mut Conflict<'_>,
) -> Result<Value, RecordError> {
    match (prev, next) {
        (Value::Record(record), Value::Map(_) | Value::Record(_)) => {
            let mut edit = record.as_mutable();
            edit.merge_deep_dyn(next, conflict)?;
            Ok(Value::Record(edit.as_immutable()))
        }
        (Value::Map(map), Value::Map(_) | Value::Record(_)) => {
            let mut merged = map.clone();
            for (k, v) in source_entries(next, key)? {
                let value = match merged.get(k.as_str()) {
                    Some(existing) => deep_merge(existing, &v, &k, conflict)?,
                    None => v,
                };
                merged.insert(k, value);
            }
            Ok(Value::Map(merged))
        }
        (Value::List(items), Value::List(incoming)) => {
            let mut merged = items.clone();
            for (i, v) in incoming.iter().enumerate() {
                if i < merged.len() {
                    let value = deep_merge(&merged[i], v, key, conflict)?;
                    merged.set(i, value);
                } else {
                    merged.push_back(v.clone());
                }
            }
            Ok(Value::List(merged))
        }
        _ => Ok(conflict(prev, next, key)),
    }
}
