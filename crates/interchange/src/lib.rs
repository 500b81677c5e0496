//! recordkit-interchange: factory registries and deep deserialization.
//!
//! A [`FactoryRegistry`] maps factory names to record factories and their
//! [`Descriptor`]s. [`from_json`] walks a plain JSON document according to
//! those descriptors and rebuilds it as a graph of nested
//! [`Record`](recordkit_core::Record)s, bottom-up.
//!
//! Registries can be built in code through [`FactoryRegistry::builder`] or
//! declared as data through [`SchemaDocument`]. Either way they are validated
//! once, when built: every descriptor must point at a registered factory.

pub mod deserialize;
pub mod error;
pub mod registry;
pub mod schema;

pub use deserialize::{from_json, from_json_with, DeserializeOptions, DEFAULT_MAX_DEPTH};
pub use error::InterchangeError;
pub use registry::{Descriptor, FactoryRegistry, FactoryRegistryBuilder, RegistryEntry};
pub use schema::{SchemaDocument, SchemaEntry};
