/// Errors raised while constructing or editing records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The key is not part of the record's template. Record key sets are
    /// fixed when the factory is defined.
    #[error("cannot set unknown key '{key}' on {record}")]
    UnknownKey { record: String, key: String },

    /// A factory was handed something other than an object-shaped value.
    #[error("{record} expects an object, got {found}")]
    NotAnObject { record: String, found: &'static str },

    /// A key path could not be followed or written.
    #[error("invalid key path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A record of one shape was offered where another shape was expected.
    #[error("expected a {expected} record, got {found}")]
    ShapeMismatch { expected: String, found: String },
}
