//! Error types for composite key encoding and decoding.

use thiserror::Error;

/// Errors raised while building or parsing a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The display name cannot be embedded in a composite key.
    #[error("invalid display name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The identifier cannot be embedded in a composite key.
    #[error("invalid identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: String },

    /// The namespace prefix is unusable.
    #[error("invalid namespace prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// A stored key does not follow the composite key layout.
    #[error("malformed key {key:?}: {reason}")]
    MalformedKey { key: String, reason: String },
}

/// Convenience type alias for key operations.
pub type KeyResult<T> = std::result::Result<T, KeyError>;
