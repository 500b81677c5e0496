//! recordkit-core: immutable, structurally typed records.
//!
//! A [`Template`] fixes a record type's key set and default values. A
//! [`RecordFactory`] built from it turns plain nested data into [`Record`]
//! instances; [`recordify`] does the same once without keeping the factory.
//!
//! Records are persistent values backed by `imbl` maps. The full operation
//! surface (get/set/delete, key paths, shallow and deep merge, batched
//! mutation, conversion back to plain JSON) lives on the [`RecordOps`] trait,
//! which both dynamic records and [`TypedRecord`]s implement.
//!
//! Deciding which nested objects become records is left to
//! `recordkit-interchange`.

pub mod error;
pub mod factory;
pub mod key;
mod keypath;
mod merge;
pub mod mutable;
pub mod ops;
pub mod record;
pub mod template;
pub mod typed;
pub mod value;

pub use error::RecordError;
pub use factory::{recordify, RecordFactory, DEFAULT_RECORD_NAME};
pub use key::Key;
pub use mutable::MutableRecord;
pub use ops::RecordOps;
pub use record::Record;
pub use template::Template;
pub use typed::{RecordShape, TypedRecord};
pub use value::Value;

/// Re-exported so callers can name the persistent containers inside values.
pub use imbl::{OrdMap, Vector};
