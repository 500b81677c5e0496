//! The dynamic record type.

use std::fmt;
use std::sync::Arc;

use imbl::OrdMap;

use crate::mutable::MutableRecord;
use crate::ops::RecordOps;
use crate::template::Template;
use crate::value::Value;

/// What every record of one type shares: its diagnostic name and template.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Shape {
    pub(crate) name: String,
    pub(crate) template: Template,
}

/// An immutable keyed container whose key set is exactly its template's key
/// set.
///
/// Records are cheap to clone: the field map is a persistent `imbl::OrdMap`
/// and the shape is shared. Every editing operation (see [`RecordOps`])
/// returns a new record and leaves the receiver untouched. Equality is by
/// value: two records are equal when they have the same type name and all
/// corresponding fields are equal.
#[derive(Clone)]
pub struct Record {
    shape: Arc<Shape>,
    values: OrdMap<String, Value>,
}

impl Record {
    /// Callers guarantee `values` holds exactly the template's keys.
    pub(crate) fn from_parts(shape: Arc<Shape>, values: OrdMap<String, Value>) -> Self {
        Record { shape, values }
    }

    pub(crate) fn values(&self) -> &OrdMap<String, Value> {
        &self.values
    }

    /// The diagnostic name given to the record's factory.
    pub fn name(&self) -> &str {
        &self.shape.name
    }

    pub fn template(&self) -> &Template {
        &self.shape.template
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Whether both records were minted from the same factory definition.
    pub fn same_shape(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.shape, &other.shape) || self.shape == other.shape
    }

    /// Enters the batched-mutation mode. The returned builder edits its own
    /// copy; call [`MutableRecord::as_immutable`] to get a record back.
    pub fn as_mutable(&self) -> MutableRecord {
        MutableRecord::new(self.shape.clone(), self.values.clone())
    }

    /// Converts to plain JSON, recursively unwrapping nested records, maps
    /// and lists.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Shallow conversion: the field map itself, nested records left as-is.
    pub fn to_map(&self) -> OrdMap<String, Value> {
        self.values.clone()
    }
}

impl RecordOps for Record {
    fn record(&self) -> &Record {
        self
    }

    fn wrap(record: Record) -> Self {
        record
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.shape.name == other.shape.name && self.values == other.values
    }
}

impl Eq for Record {}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.shape.name)?;
        f.debug_map().entries(self.values.iter()).finish()
    }
}
