//! Batched mutation of records.
//!
//! A [`MutableRecord`] owns a private copy of a record's field map and edits
//! it in place. Because `imbl` maps are copy-on-write, a batch of edits only
//! copies the nodes it touches once, and no intermediate records are built.
//! The batch ends with [`MutableRecord::as_immutable`], which yields exactly
//! one new record.

use std::sync::Arc;

use imbl::OrdMap;

use crate::error::RecordError;
use crate::key::{display_path, Key};
use crate::keypath::{delete_in_value, set_in_value};
use crate::merge::{deep_merge, source_entries, Conflict};
use crate::record::{Record, Shape};
use crate::value::Value;

/// A record in temporarily-mutable mode.
pub struct MutableRecord {
    shape: Arc<Shape>,
    values: OrdMap<String, Value>,
}

impl MutableRecord {
    pub(crate) fn new(shape: Arc<Shape>, values: OrdMap<String, Value>) -> Self {
        MutableRecord { shape, values }
    }

    pub fn name(&self) -> &str {
        &self.shape.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_in(&self, path: &[Key]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.values.get(first.as_field()?)?;
        for key in rest {
            current = current.get_key(key)?;
        }
        Some(current)
    }

    fn ensure_known(&self, key: &str) -> Result<(), RecordError> {
        if self.shape.template.contains(key) {
            Ok(())
        } else {
            Err(RecordError::UnknownKey {
                record: self.shape.name.clone(),
                key: key.to_string(),
            })
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self, RecordError> {
        self.ensure_known(key)?;
        self.values.insert(key.to_string(), value.into());
        Ok(self)
    }

    /// Resets `key` to its template default. Record key sets never shrink.
    pub fn delete(&mut self, key: &str) -> Result<&mut Self, RecordError> {
        self.ensure_known(key)?;
        if let Some(default) = self.shape.template.default_of(key) {
            self.values.insert(key.to_string(), default.clone());
        }
        Ok(self)
    }

    /// Resets every field to its template default.
    pub fn clear(&mut self) -> &mut Self {
        self.values = self.shape.template.defaults().clone();
        self
    }

    pub fn update<F>(&mut self, key: &str, f: F) -> Result<&mut Self, RecordError>
    where
        F: FnOnce(Value) -> Value,
    {
        self.ensure_known(key)?;
        let current = self.values.get(key).cloned().unwrap_or_default();
        self.values.insert(key.to_string(), f(current));
        Ok(self)
    }

    /// Writes `value` at `path`. The first step must name a template field;
    /// deeper steps may create missing maps along the way.
    pub fn set_in(
        &mut self,
        path: &[Key],
        value: impl Into<Value>,
    ) -> Result<&mut Self, RecordError> {
        let Some((first, rest)) = path.split_first() else {
            return Err(RecordError::InvalidPath {
                path: String::new(),
                reason: "empty key path".to_string(),
            });
        };
        let field = first.as_field().ok_or_else(|| RecordError::InvalidPath {
            path: display_path(path),
            reason: format!("{} must be addressed by field name", self.shape.name),
        })?;
        self.ensure_known(field)?;
        let child = set_in_value(self.values.get(field), rest, value.into(), path)?;
        self.values.insert(field.to_string(), child);
        Ok(self)
    }

    /// Removes the entry at `path`. A record field at the end of the path is
    /// reset to its default; paths that lead nowhere are a no-op.
    pub fn delete_in(&mut self, path: &[Key]) -> &mut Self {
        let Some((Key::Field(field), rest)) = path.split_first() else {
            return self;
        };
        if !self.shape.template.contains(field) {
            return self;
        }
        if rest.is_empty() {
            if let Some(default) = self.shape.template.default_of(field) {
                self.values.insert(field.clone(), default.clone());
            }
        } else if let Some(child) = self.values.get(field.as_str()) {
            let child = delete_in_value(child, rest);
            self.values.insert(field.clone(), child);
        }
        self
    }

    /// Applies `f` to the value at `path` (`Null` when absent) and writes the
    /// result back.
    pub fn update_in<F>(&mut self, path: &[Key], f: F) -> Result<&mut Self, RecordError>
    where
        F: FnOnce(Value) -> Value,
    {
        let current = self.get_in(path).cloned().unwrap_or_default();
        self.set_in(path, f(current))
    }

    /// Shallow merge: every field of `source` replaces the current value.
    pub fn merge(&mut self, source: &Value) -> Result<&mut Self, RecordError> {
        self.merge_with(source, |_, next, _| next.clone())
    }

    /// Shallow merge settling each field with `conflict(prev, next, key)`.
    pub fn merge_with<F>(
        &mut self,
        source: &Value,
        mut conflict: F,
    ) -> Result<&mut Self, RecordError>
    where
        F: FnMut(&Value, &Value, &str) -> Value,
    {
        for (key, next) in source_entries(source, &self.shape.name)? {
            self.ensure_known(&key)?;
            let merged = match self.values.get(key.as_str()) {
                Some(prev) => conflict(prev, &next, &key),
                None => next,
            };
            self.values.insert(key, merged);
        }
        Ok(self)
    }

    /// Deep merge: nested records, maps and lists merge recursively.
    pub fn merge_deep(&mut self, source: &Value) -> Result<&mut Self, RecordError> {
        self.merge_deep_with(source, |_, next, _| next.clone())
    }

    /// Deep merge settling leaf conflicts with `conflict(prev, next, key)`.
    pub fn merge_deep_with<F>(
        &mut self,
        source: &Value,
        mut conflict: F,
    ) -> Result<&mut Self, RecordError>
    where
        F: FnMut(&Value, &Value, &str) -> Value,
    {
        self.merge_deep_dyn(source, &mut conflict)?;
        Ok(self)
    }

    pub(crate) fn merge_deep_dyn(
        &mut self,
        source: &Value,
        conflict: &mut Conflict<'_>,
    ) -> Result<(), RecordError> {
        for (key, next) in source_entries(source, &self.shape.name)? {
            self.ensure_known(&key)?;
            let merged = match self.values.get(key.as_str()) {
                Some(prev) => deep_merge(prev, &next, &key, conflict)?,
                None => next,
            };
            self.values.insert(key, merged);
        }
        Ok(())
    }

    /// Leaves mutable mode.
    pub fn as_immutable(self) -> Record {
        Record::from_parts(self.shape, self.values)
    }
}
