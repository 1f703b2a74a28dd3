//! Flat key-value object storage for SheetVault.
//!
//! The namespace manager treats storage as an external collaborator offering
//! five primitives: `get`, `put`, `list`, `copy` and `delete`. This crate
//! defines that capability and ships two backends.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- one file per key below a root directory
//!
//! # Design Rules
//!
//! 1. The store never interprets object contents -- payloads are opaque bytes
//!    tagged with a caller-supplied content type.
//! 2. Every call either takes effect and returns `Ok`, or fails; there are no
//!    multi-key transactions.
//! 3. All I/O errors are propagated, never silently ignored.
//! 4. Nothing is retried here; retry policy belongs to the caller.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{StoredObject, DEFAULT_CONTENT_TYPE};
pub use traits::ObjectStore;
