//! Key-path writes below the first level of a record.
//!
//! Records handle their own first step (so unknown keys are rejected there);
//! these helpers rebuild whatever lies underneath, persistently.

use imbl::OrdMap;

use crate::error::RecordError;
use crate::key::{display_path, Key};
use crate::value::Value;

fn invalid(path: &[Key], reason: impl Into<String>) -> RecordError {
    RecordError::InvalidPath {
        path: display_path(path),
        reason: reason.into(),
    }
}

/// Returns `target` with `value` written at `rest`. `path` is the full path
/// for error messages. Missing or null intermediates become new maps when the
/// next step is a field name.
pub(crate) fn set_in_value(
    target: Option<&Value>,
    rest: &[Key],
    value: Value,
    path: &[Key],
) -> Result<Value, RecordError> {
    let Some((key, tail)) = rest.split_first() else {
        return Ok(value);
    };

    match target {
        Some(Value::Record(record)) => {
            let mut edit = record.as_mutable();
            edit.set_in(rest, value)?;
            Ok(Value::Record(edit.as_immutable()))
        }
        Some(Value::Map(map)) => {
            let field = key
                .as_field()
                .ok_or_else(|| invalid(path, format!("cannot index map with {}", key)))?;
            let child = set_in_value(map.get(field), tail, value, path)?;
            let mut map = map.clone();
            map.insert(field.to_string(), child);
            Ok(Value::Map(map))
        }
        Some(Value::List(items)) => {
            let Key::Index(i) = key else {
                return Err(invalid(
                    path,
                    format!("cannot address list with field '{}'", key),
                ));
            };
            let i = *i;
            if i > items.len() {
                return Err(invalid(
                    path,
                    format!(
                        "index {} out of bounds for list of length {}",
                        i,
                        items.len()
                    ),
                ));
            }
            let child = set_in_value(items.get(i), tail, value, path)?;
            let mut items = items.clone();
            if i == items.len() {
                items.push_back(child);
            } else {
                items.set(i, child);
            }
            Ok(Value::List(items))
        }
        None | Some(Value::Null) => {
            let field = key
                .as_field()
                .ok_or_else(|| invalid(path, format!("cannot index missing value with {}", key)))?;
            let child = set_in_value(None, tail, value, path)?;
            let mut map = OrdMap::new();
            map.insert(field.to_string(), child);
            Ok(Value::Map(map))
        }
        Some(other) => Err(invalid(
            path,
            format!("cannot descend into {}", other.type_name()),
        )),
    }
}

/// Returns `target` with the entry at `rest` removed. Paths that lead
/// nowhere leave the value unchanged. Record fields are reset to their
/// defaults rather than removed.
pub(crate) fn delete_in_value(target: &Value, rest: &[Key]) -> Value {
    let Some((key, tail)) = rest.split_first() else {
        return target.clone();
    };

    match (target, key) {
        (Value::Record(record), Key::Field(field)) => {
            if !record.template().contains(field) {
                return target.clone();
            }
            let mut edit = record.as_mutable();
            edit.delete_in(rest);
            Value::Record(edit.as_immutable())
        }
        (Value::Map(map), Key::Field(field)) => {
            let Some(child) = map.get(field.as_str()) else {
                return target.clone();
            };
            let mut map = map.clone();
            if tail.is_empty() {
                map.remove(field.as_str());
            } else {
                let child = delete_in_value(child, tail);
                map.insert(field.clone(), child);
            }
            Value::Map(map)
        }
        (Value::List(items), Key::Index(i)) => {
            let Some(child) = items.get(*i) else {
                return target.clone();
            };
            let mut items = items.clone();
            if tail.is_empty() {
                items.remove(*i);
            } else {
                let child = delete_in_value(child, tail);
                items.set(*i, child);
            }
            Value::List(items)
        }
        _ => target.clone(),
    }
}
