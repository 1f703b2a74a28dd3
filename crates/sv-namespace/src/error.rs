//! Error types for namespace operations.

use sv_keys::KeyError;
use sv_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the namespace manager.
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// The display name cannot be encoded.
    #[error("invalid display name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The identifier cannot be encoded.
    #[error("invalid identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: String },

    /// A caller-supplied composite key could not be decoded.
    #[error("malformed key {key:?}: {reason}")]
    MalformedKey { key: String, reason: String },

    /// The display name belongs to a different identifier.
    #[error("Character name \"{name}\" already exists.")]
    Conflict { name: String },

    /// Nothing matches the load query.
    #[error("character sheet not found: {query}")]
    NotFound { query: String },

    /// The load query matches more than one stored key.
    #[error("multiple character sheets match {query:?}: {}", candidates.join(", "))]
    AmbiguousKey {
        query: String,
        candidates: Vec<String>,
    },

    /// The snapshot breaks the one-name-one-identifier rule.
    #[error("namespace invariant violated for {name:?}: {detail}")]
    InvariantViolation { name: String, detail: String },

    /// Invalid namespace configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The object store call failed. Safe to retry from the caller.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl NamespaceError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<KeyError> for NamespaceError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            KeyError::InvalidIdentifier { id, reason } => Self::InvalidIdentifier { id, reason },
            KeyError::MalformedKey { key, reason } => Self::MalformedKey { key, reason },
            KeyError::InvalidPrefix { prefix, reason } => {
                Self::Config(format!("invalid prefix {prefix:?}: {reason}"))
            }
        }
    }
}

/// Convenience type alias for namespace operations.
pub type NamespaceResult<T> = std::result::Result<T, NamespaceError>;
