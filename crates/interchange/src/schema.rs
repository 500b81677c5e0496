//! Registries declared as data.
//!
//! A schema document maps each factory name to its template and, optionally,
//! its descriptor:
//!
//! ```json
//! {
//!   "person": { "template": {"name": "", "pets": []}, "descriptor": {"pets": "pet"} },
//!   "pet":    { "template": {"name": "", "type": ""} }
//! }
//! ```

use std::collections::BTreeMap;

use recordkit_core::{RecordFactory, Template};
use serde::{Deserialize, Serialize};

use crate::error::InterchangeError;
use crate::registry::{Descriptor, FactoryRegistry};

/// A whole registry in serializable form, keyed by factory name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDocument {
    pub factories: BTreeMap<String, SchemaEntry>,
}

/// One record type in a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaEntry {
    /// Default values; must be a JSON object.
    pub template: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Descriptor>,
    /// Diagnostic name for the factory. Defaults to the registry key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SchemaDocument {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, InterchangeError> {
        serde_json::from_value(value.clone())
            .map_err(|e| InterchangeError::InvalidSchema(e.to_string()))
    }

    pub fn parse(text: &str) -> Result<Self, InterchangeError> {
        serde_json::from_str(text).map_err(|e| InterchangeError::InvalidSchema(e.to_string()))
    }

    /// Builds and validates the registry the document describes.
    pub fn into_registry(self) -> Result<FactoryRegistry, InterchangeError> {
        let mut builder = FactoryRegistry::builder();
        for (key, entry) in self.factories {
            let template = Template::from_json(&entry.template).map_err(|_| {
                InterchangeError::InvalidSchema(format!(
                    "template for '{}' must be a JSON object",
                    key
                ))
            })?;
            let name = entry.name.as_deref().unwrap_or(&key);
            let factory = RecordFactory::new(template, Some(name));
            builder = builder.register(key, factory, entry.descriptor);
        }
        builder.build()
    }
}

impl FactoryRegistry {
    /// Builds a registry from a schema document value.
    pub fn from_schema(schema: &serde_json::Value) -> Result<Self, InterchangeError> {
        SchemaDocument::from_value(schema)?.into_registry()
    }

    /// Builds a registry from schema document text.
    pub fn from_schema_str(schema: &str) -> Result<Self, InterchangeError> {
        SchemaDocument::parse(schema)?.into_registry()
    }
}
