//! Default-value templates that fix a record type's key set.

use imbl::OrdMap;

use crate::error::RecordError;
use crate::value::Value;

/// Attribute name -> default value. The keys of a template are, once and for
/// all, the keys of every record built from it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    fields: OrdMap<String, Value>,
}

impl Template {
    pub fn new() -> Self {
        Template {
            fields: OrdMap::new(),
        }
    }

    /// Adds (or replaces) a field and its default.
    pub fn field(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), default.into());
        self
    }

    /// Builds a template from a plain JSON object. Nested objects in default
    /// positions stay plain maps.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, RecordError> {
        match json {
            serde_json::Value::Object(fields) => Ok(Template {
                fields: fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            }),
            other => Err(RecordError::NotAnObject {
                record: "template".to_string(),
                found: Value::from_json(other).type_name(),
            }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn default_of(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The defaults as a persistent map. Cloning is O(1).
    pub fn defaults(&self) -> &OrdMap<String, Value> {
        &self.fields
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Template {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Template {
            fields: iter
                .into_iter()
                .map(|(k, v)| -> (String, Value) { (k.into(), v.into()) })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_requires_object() {
        let err = Template::from_json(&json!(["name"])).unwrap_err();
        assert_eq!(
            err,
            RecordError::NotAnObject {
                record: "template".to_string(),
                found: "list",
            }
        );
    }

    #[test]
    fn builder_and_json_agree() {
        let built = Template::new().field("name", "").field("age", 0);
        let parsed = Template::from_json(&json!({"name": "", "age": 0})).unwrap();
        assert_eq!(built, parsed);
        assert!(built.contains("age"));
        assert!(!built.contains("email"));
        assert_eq!(built.len(), 2);
    }
}
