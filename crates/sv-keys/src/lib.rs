//! Composite keys for the SheetVault namespace.
//!
//! Every character sheet lives under one object-store key that carries both
//! its human-readable display name and its stable, caller-assigned
//! identifier:
//!
//! ```text
//! character-sheets/Aragorn|:|0190c5e2-7b1d-7c3a-9d6e-1f2a3b4c5d6e.json
//! ^ prefix         ^ name  ^ sep ^ identifier                        ^ suffix
//! ```
//!
//! # Modules
//!
//! - [`error`] -- Error types for key operations
//! - [`key`] -- [`CompositeKey`] and the [`KeyCodec`] that encodes/decodes it
//! - [`names`] -- Display name and identifier validation

pub mod error;
pub mod key;
pub mod names;

pub use error::{KeyError, KeyResult};
pub use key::{CompositeKey, KeyCodec, DEFAULT_PREFIX, KEY_SUFFIX, SEPARATOR};
pub use names::{validate_display_name, validate_identifier};
