//! Schema-driven deserialization of plain JSON into nested records.
//!
//! The main entry point is [`from_json`], which takes a
//! `&serde_json::Value`, a [`FactoryRegistry`] and the name of the root
//! factory, and produces a [`Record`].
//!
//! Conversion is driven by descriptors only. For each field the root
//! factory's descriptor names, an array is converted element by element and
//! an object is converted once, both with the named nested factory. Every
//! other field is copied as plain data, even when it looks like a record.
//! Traversal is depth-first and pre-order; repeated sub-objects become
//! distinct records. Any failure aborts the whole call.

use imbl::{OrdMap, Vector};
use recordkit_core::{Record, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::InterchangeError;
use crate::registry::{FactoryRegistry, RegistryEntry};

/// Default bound on how many records deep a document may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs for [`from_json_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeserializeOptions {
    /// Maximum record nesting below the root. Descriptor graphs may be
    /// cyclic, so only the input bounds recursion; this turns pathological
    /// input into [`InterchangeError::DepthExceeded`] instead of exhausting
    /// the stack.
    pub max_depth: usize,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        DeserializeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Deserialize `obj` into a record of the factory registered as `name`,
/// using default options.
pub fn from_json(
    obj: &serde_json::Value,
    registry: &FactoryRegistry,
    name: &str,
) -> Result<Record, InterchangeError> {
    from_json_with(obj, registry, name, &DeserializeOptions::default())
}

/// Deserialize `obj` into a record of the factory registered as `name`.
pub fn from_json_with(
    obj: &serde_json::Value,
    registry: &FactoryRegistry,
    name: &str,
    options: &DeserializeOptions,
) -> Result<Record, InterchangeError> {
    debug!(factory = name, "deserializing document");
    Deserializer { registry, options }.convert(obj, name, 0)
}

impl FactoryRegistry {
    /// Shorthand for [`from_json`] against this registry.
    pub fn deserialize(
        &self,
        obj: &serde_json::Value,
        name: &str,
    ) -> Result<Record, InterchangeError> {
        from_json(obj, self, name)
    }
}

struct Deserializer<'a> {
    registry: &'a FactoryRegistry,
    options: &'a DeserializeOptions,
}

impl Deserializer<'_> {
    fn convert(
        &self,
        obj: &serde_json::Value,
        name: &str,
        depth: usize,
    ) -> Result<Record, InterchangeError> {
        if depth > self.options.max_depth {
            return Err(InterchangeError::DepthExceeded {
                factory: name.to_string(),
                max_depth: self.options.max_depth,
            });
        }

        let entry = self.registry.resolve(name)?;

        // Null and non-object input go straight to the factory, which
        // produces defaults or rejects the value.
        let serde_json::Value::Object(fields) = obj else {
            return Ok(entry.factory().create(Some(&Value::from_json(obj)))?);
        };

        let working = self.working_copy(entry, fields, name, depth)?;
        Ok(entry.factory().create_from_map(&working))
    }

    /// Shallow copy of an input object ready for the factory. Described
    /// fields are converted straight from the input; the remaining template
    /// fields are copied as plain data. Fields the template does not know are
    /// dropped here, since the factory would ignore them anyway.
    fn working_copy(
        &self,
        entry: &RegistryEntry,
        fields: &serde_json::Map<String, serde_json::Value>,
        name: &str,
        depth: usize,
    ) -> Result<OrdMap<String, Value>, InterchangeError> {
        let mut working = OrdMap::new();

        if let Some(descriptor) = entry.descriptor() {
            for (field, nested) in descriptor.iter() {
                let converted = match fields.get(field) {
                    Some(serde_json::Value::Array(items)) => {
                        trace!(
                            factory = name,
                            field,
                            nested,
                            depth,
                            "converting list field"
                        );
                        Value::List(self.convert_all(items, nested, depth + 1)?)
                    }
                    Some(raw @ serde_json::Value::Object(_)) => {
                        trace!(
                            factory = name,
                            field,
                            nested,
                            depth,
                            "converting object field"
                        );
                        Value::Record(self.convert(raw, nested, depth + 1)?)
                    }
                    _ => continue,
                };
                working.insert(field.to_string(), converted);
            }
        }

        let template = entry.factory().template();
        for (key, raw) in fields {
            if template.contains(key) && !working.contains_key(key.as_str()) {
                working.insert(key.clone(), Value::from_json(raw));
            }
        }

        Ok(working)
    }

    /// Converts every element with the same factory, keeping order.
    fn convert_all(
        &self,
        items: &[serde_json::Value],
        name: &str,
        depth: usize,
    ) -> Result<Vector<Value>, InterchangeError> {
        items
            .iter()
            .map(|item| self.convert(item, name, depth).map(Value::Record))
            .collect()
    }
}
