//! The unit of storage: an opaque payload tagged with its content type.

use bytes::Bytes;

/// Content type used when a caller does not supply one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// An object as held by a store.
///
/// The store never interprets `data`; `content_type` is carried verbatim so
/// it can be echoed back on read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The raw payload.
    pub data: Bytes,
    /// MIME type supplied by the writer.
    pub content_type: String,
}

impl StoredObject {
    /// Create an object from a payload and content type.
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    /// Create a JSON object (`application/json`).
    pub fn json(data: impl Into<Bytes>) -> Self {
        Self::new(data, DEFAULT_CONTENT_TYPE)
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
