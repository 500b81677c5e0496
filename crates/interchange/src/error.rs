use recordkit_core::RecordError;

/// Errors raised while building a factory registry or deserializing through
/// one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterchangeError {
    /// A factory name (root or nested) is not in the registry.
    #[error("missing factory: '{name}'")]
    MissingFactory { name: String },

    /// A descriptor names a factory that was never registered.
    #[error("factory '{factory}' maps field '{field}' to unregistered factory '{target}'")]
    UnknownFactory {
        factory: String,
        field: String,
        target: String,
    },

    /// The same factory name was registered twice.
    #[error("factory '{name}' is registered more than once")]
    DuplicateFactory { name: String },

    /// Input nesting went deeper than the configured limit.
    #[error("nesting below factory '{factory}' exceeds the maximum depth of {max_depth}")]
    DepthExceeded { factory: String, max_depth: usize },

    /// A schema document could not be turned into a registry.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A factory rejected its input.
    #[error(transparent)]
    Record(#[from] RecordError),
}
