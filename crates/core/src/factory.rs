//! Record factories: typed constructors minted from a template.

use std::fmt;
use std::sync::Arc;

use imbl::OrdMap;
use tracing::trace;

use crate::error::RecordError;
use crate::record::{Record, Shape};
use crate::template::Template;
use crate::value::Value;

/// Name used when a factory is defined without one.
pub const DEFAULT_RECORD_NAME: &str = "Record";

/// A constructor for one record type.
///
/// The factory owns the template that fixes the type's key set. Each call to
/// [`create`](RecordFactory::create) produces an independent record; fields
/// missing from the argument fall back to the template's default. Only
/// top-level presence is checked, nested values are never merged with their
/// defaults.
#[derive(Clone)]
pub struct RecordFactory {
    shape: Arc<Shape>,
}

impl RecordFactory {
    pub fn new(template: Template, name: Option<&str>) -> Self {
        RecordFactory {
            shape: Arc::new(Shape {
                name: name.unwrap_or(DEFAULT_RECORD_NAME).to_string(),
                template,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shape.name
    }

    pub fn template(&self) -> &Template {
        &self.shape.template
    }

    /// A record holding exactly the template's defaults.
    pub fn default_record(&self) -> Record {
        Record::from_parts(self.shape.clone(), self.shape.template.defaults().clone())
    }

    /// Builds a record from an optional object-shaped value.
    ///
    /// `None` and `Null` produce the defaults. Maps and records contribute the
    /// fields the template knows about; their other fields are ignored. Any
    /// other value fails with [`RecordError::NotAnObject`].
    pub fn create(&self, value: Option<&Value>) -> Result<Record, RecordError> {
        trace!(record = %self.shape.name, "constructing record");
        match value {
            None | Some(Value::Null) => Ok(self.default_record()),
            Some(Value::Map(fields)) => Ok(self.create_from_map(fields)),
            Some(Value::Record(record)) => Ok(self.create_from_map(record.values())),
            Some(other) => Err(RecordError::NotAnObject {
                record: self.shape.name.clone(),
                found: other.type_name(),
            }),
        }
    }

    /// Builds a record from plain JSON. Nested objects stay plain maps.
    pub fn create_from_json(&self, json: &serde_json::Value) -> Result<Record, RecordError> {
        self.create(Some(&Value::from_json(json)))
    }

    /// Builds a record from a field map, falling back to defaults for the
    /// template keys the map lacks.
    pub fn create_from_map(&self, fields: &OrdMap<String, Value>) -> Record {
        let mut values = self.shape.template.defaults().clone();
        for key in self.shape.template.keys() {
            if let Some(value) = fields.get(key.as_str()) {
                values.insert(key.clone(), value.clone());
            }
        }
        Record::from_parts(self.shape.clone(), values)
    }
}

impl fmt::Debug for RecordFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFactory")
            .field("name", &self.shape.name)
            .field("keys", &self.shape.template.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds a factory for `template`, applies it once to `value` and discards
/// it. Use a [`RecordFactory`] directly when more instances are needed.
pub fn recordify(
    template: Template,
    value: Option<&Value>,
    name: Option<&str>,
) -> Result<Record, RecordError> {
    RecordFactory::new(template, name).create(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::RecordOps;
    use serde_json::json;

    fn person_template() -> Template {
        Template::from_json(&json!({"name": "", "age": 0, "tags": []})).unwrap()
    }

    #[test]
    fn no_value_yields_defaults() {
        let factory = RecordFactory::new(person_template(), Some("Person"));
        let record = factory.create(None).unwrap();
        assert_eq!(record.to_json(), json!({"name": "", "age": 0, "tags": []}));
        assert_eq!(record.name(), "Person");
    }

    #[test]
    fn partial_value_falls_back_per_field() {
        let factory = RecordFactory::new(person_template(), None);
        let record = factory.create_from_json(&json!({"name": "Ann"})).unwrap();
        assert_eq!(record.get("name").and_then(Value::as_str), Some("Ann"));
        assert_eq!(record.get("age").and_then(Value::as_i64), Some(0));
        assert_eq!(record.name(), DEFAULT_RECORD_NAME);
    }

    #[test]
    fn explicit_null_is_kept() {
        let factory = RecordFactory::new(person_template(), None);
        let record = factory.create_from_json(&json!({"name": null})).unwrap();
        assert_eq!(record.get("name"), Some(&Value::Null));
    }

    #[test]
    fn unknown_input_fields_are_dropped() {
        let factory = RecordFactory::new(person_template(), None);
        let record = factory
            .create_from_json(&json!({"name": "Ann", "email": "ann@example.com"}))
            .unwrap();
        assert!(record.get("email").is_none());
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn default_fallback_is_not_deep() {
        let template = Template::from_json(&json!({"address": {"city": "Oslo", "zip": "0150"}}))
            .unwrap();
        let record = recordify(
            template,
            Some(&Value::from_json(&json!({"address": {"city": "Bergen"}}))),
            None,
        )
        .unwrap();
        assert_eq!(record.to_json(), json!({"address": {"city": "Bergen"}}));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let factory = RecordFactory::new(person_template(), Some("Person"));
        let err = factory.create(Some(&Value::from("Ann"))).unwrap_err();
        assert_eq!(
            err,
            RecordError::NotAnObject {
                record: "Person".to_string(),
                found: "string",
            }
        );
    }

    #[test]
    fn recordify_null_equals_recordify_template() {
        let template = person_template();
        let from_null = recordify(template.clone(), Some(&Value::Null), None).unwrap();
        let from_none = recordify(template.clone(), None, None).unwrap();
        let template_value = Value::Map(template.defaults().clone());
        let from_template = recordify(template, Some(&template_value), None).unwrap();
        assert_eq!(from_null, from_template);
        assert_eq!(from_none, from_template);
    }

    #[test]
    fn flat_round_trip() {
        let factory = RecordFactory::new(person_template(), None);
        let input = json!({"name": "Ann", "age": 31, "tags": ["a"]});
        assert_eq!(factory.create_from_json(&input).unwrap().to_json(), input);
    }

    #[test]
    fn instances_are_independent() {
        let factory = RecordFactory::new(person_template(), None);
        let a = factory.create_from_json(&json!({"name": "Ann"})).unwrap();
        let b = factory.create_from_json(&json!({"name": "Ann"})).unwrap();
        let renamed = a.set("name", "Bea").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get("name").and_then(Value::as_str), Some("Ann"));
        assert_eq!(renamed.get("name").and_then(Value::as_str), Some("Bea"));
    }
}
