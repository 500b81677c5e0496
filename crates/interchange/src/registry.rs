//! Factory registries: named record factories plus the descriptors that say
//! which of their fields hold nested records.

use std::collections::BTreeMap;

use recordkit_core::{RecordFactory, Template};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InterchangeError;

// ── Descriptor ──────────────────────────────────────────────────────

/// Field name -> name of the factory that converts that field's raw value.
///
/// Fields not listed are copied as-is, whatever they contain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor {
    fields: BTreeMap<String, String>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: impl Into<String>, factory: impl Into<String>) -> Self {
        self.fields.insert(field.into(), factory.into());
        self
    }

    /// The factory converting `field`, if the field is nested.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// `(field, factory)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(f, t)| (f.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<F: Into<String>, T: Into<String>> FromIterator<(F, T)> for Descriptor {
    fn from_iter<I: IntoIterator<Item = (F, T)>>(iter: I) -> Self {
        Descriptor {
            fields: iter
                .into_iter()
                .map(|(f, t)| (f.into(), t.into()))
                .collect(),
        }
    }
}

// ── Registry ────────────────────────────────────────────────────────

/// One registered record type.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    factory: RecordFactory,
    descriptor: Option<Descriptor>,
}

impl RegistryEntry {
    pub fn factory(&self) -> &RecordFactory {
        &self.factory
    }

    /// `None` means no field of this type holds nested records.
    pub fn descriptor(&self) -> Option<&Descriptor> {
        self.descriptor.as_ref()
    }
}

/// A read-only table of named factories driving recursive deserialization.
///
/// Registries are built once through [`FactoryRegistry::builder`], which
/// checks that every descriptor points at a registered factory. After that
/// they never change, so one registry can be shared freely (it is `Send +
/// Sync`).
#[derive(Debug, Clone, Default)]
pub struct FactoryRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl FactoryRegistry {
    pub fn builder() -> FactoryRegistryBuilder {
        FactoryRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// Looks up `name`, failing with [`InterchangeError::MissingFactory`].
    pub fn resolve(&self, name: &str) -> Result<&RegistryEntry, InterchangeError> {
        self.entries
            .get(name)
            .ok_or_else(|| InterchangeError::MissingFactory {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects factories and validates the whole set in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct FactoryRegistryBuilder {
    entries: BTreeMap<String, RegistryEntry>,
    duplicates: Vec<String>,
}

impl FactoryRegistryBuilder {
    /// Registers `factory` under `name`. The registry name is what
    /// descriptors refer to; it need not match the factory's own name.
    pub fn register(
        mut self,
        name: impl Into<String>,
        factory: RecordFactory,
        descriptor: Option<Descriptor>,
    ) -> Self {
        let name = name.into();
        if self.entries.contains_key(&name) {
            self.duplicates.push(name);
            return self;
        }
        self.entries.insert(
            name,
            RegistryEntry {
                factory,
                descriptor,
            },
        );
        self
    }

    /// Registers a new factory for `template`, named after its registry key.
    pub fn define(
        self,
        name: impl Into<String>,
        template: Template,
        descriptor: Option<Descriptor>,
    ) -> Self {
        let name = name.into();
        let factory = RecordFactory::new(template, Some(name.as_str()));
        self.register(name, factory, descriptor)
    }

    /// Finishes the registry. Fails on the first duplicate name, or on the
    /// first descriptor field (in name order) whose factory is unregistered.
    /// Cycles between descriptors are allowed.
    pub fn build(self) -> Result<FactoryRegistry, InterchangeError> {
        if let Some(name) = self.duplicates.into_iter().next() {
            return Err(InterchangeError::DuplicateFactory { name });
        }

        for (name, entry) in &self.entries {
            let Some(descriptor) = &entry.descriptor else {
                continue;
            };
            for (field, target) in descriptor.iter() {
                if !self.entries.contains_key(target) {
                    return Err(InterchangeError::UnknownFactory {
                        factory: name.clone(),
                        field: field.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }

        debug!(factories = self.entries.len(), "factory registry built");
        Ok(FactoryRegistry {
            entries: self.entries,
        })
    }
}
