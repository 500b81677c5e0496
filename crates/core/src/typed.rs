//! Records whose shape is fixed at the type level.
//!
//! Implement [`RecordShape`] on a marker type to get a record type that can
//! only hold that shape:
//!
//! ```
//! use recordkit_core::{RecordOps, RecordShape, Template, TypedRecord};
//!
//! struct Pet;
//!
//! impl RecordShape for Pet {
//!     const NAME: &'static str = "pet";
//!     fn template() -> Template {
//!         Template::new().field("name", "").field("type", "")
//!     }
//! }
//!
//! let rex = TypedRecord::<Pet>::new().set("name", "Rex").unwrap();
//! assert_eq!(rex.get("name").and_then(|v| v.as_str()), Some("Rex"));
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::error::RecordError;
use crate::factory::RecordFactory;
use crate::ops::RecordOps;
use crate::record::Record;
use crate::template::Template;
use crate::value::Value;

/// A record type declared in code: its name and template.
pub trait RecordShape {
    const NAME: &'static str;

    fn template() -> Template;

    fn factory() -> RecordFactory {
        RecordFactory::new(Self::template(), Some(Self::NAME))
    }
}

/// A [`Record`] statically known to have shape `S`.
pub struct TypedRecord<S> {
    record: Record,
    shape: PhantomData<fn() -> S>,
}

impl<S: RecordShape> TypedRecord<S> {
    /// A record holding the shape's defaults.
    pub fn new() -> Self {
        Self::wrap(S::factory().default_record())
    }

    pub fn create(value: Option<&Value>) -> Result<Self, RecordError> {
        S::factory().create(value).map(Self::wrap)
    }

    pub fn from_json(json: &serde_json::Value) -> Result<Self, RecordError> {
        S::factory().create_from_json(json).map(Self::wrap)
    }

    /// Adopts a dynamic record, checking it was built for this shape.
    pub fn try_from_record(record: Record) -> Result<Self, RecordError> {
        if record.name() == S::NAME && record.template() == &S::template() {
            Ok(Self::wrap(record))
        } else {
            Err(RecordError::ShapeMismatch {
                expected: S::NAME.to_string(),
                found: record.name().to_string(),
            })
        }
    }
}

impl<S> TypedRecord<S> {
    pub fn as_record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

impl<S: RecordShape> Default for TypedRecord<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RecordOps for TypedRecord<S> {
    fn record(&self) -> &Record {
        &self.record
    }

    fn wrap(record: Record) -> Self {
        TypedRecord {
            record,
            shape: PhantomData,
        }
    }
}

impl<S> Clone for TypedRecord<S> {
    fn clone(&self) -> Self {
        Self::wrap(self.record.clone())
    }
}

impl<S> PartialEq for TypedRecord<S> {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl<S> Eq for TypedRecord<S> {}

impl<S> fmt::Debug for TypedRecord<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.record, f)
    }
}

impl<S> From<TypedRecord<S>> for Value {
    fn from(typed: TypedRecord<S>) -> Self {
        Value::Record(typed.record)
    }
}

impl<S: RecordShape> TryFrom<Record> for TypedRecord<S> {
    type Error = RecordError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        Self::try_from_record(record)
    }
}
