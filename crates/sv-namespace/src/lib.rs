//! Composite-key namespace manager for SheetVault.
//!
//! Character sheets live in a flat object store under one prefix, each under
//! a key that carries its display name and its stable identifier. This crate
//! keeps that namespace consistent:
//!
//! - a display name is held by at most one identifier at any instant,
//! - an identifier survives renames,
//! - a rename never deletes the old key before the new one is written.
//!
//! # Architecture
//!
//! Every save is `list -> decide -> mutate`:
//!
//! 1. [`snapshot`] lists and decodes the namespace ([`NamespaceSnapshot`]).
//! 2. [`resolver`] classifies the request into a [`SaveAction`] without
//!    touching the store.
//! 3. [`executor`] applies the action.
//!
//! Loads and listings only read: [`matcher`] resolves a load query to one key
//! and [`projector`] turns a snapshot into distinct display names.
//! [`NamespaceManager`] ties the pieces to an [`ObjectStore`](sv_store::ObjectStore).
//!
//! # Modules
//!
//! - [`config`] -- [`NamespaceConfig`] and [`RenamePolicy`]
//! - [`error`] -- [`NamespaceError`]
//! - [`executor`] -- store side effects of a save
//! - [`manager`] -- the `save` / `load` / `list` facade
//! - [`matcher`] -- load query resolution
//! - [`projector`] -- display name listing
//! - [`resolver`] -- the save decision table
//! - [`snapshot`] -- namespace listing

pub mod config;
pub mod error;
pub mod executor;
pub mod manager;
pub mod matcher;
pub mod projector;
pub mod resolver;
pub mod snapshot;

pub use config::{NamespaceConfig, RenamePolicy};
pub use error::{NamespaceError, NamespaceResult};
pub use executor::{SaveOutcome, SaveStatus};
pub use manager::{LoadedSheet, NamespaceManager};
pub use resolver::SaveAction;
pub use snapshot::NamespaceSnapshot;

// Re-export key types
pub use sv_keys::{CompositeKey, KeyCodec, DEFAULT_PREFIX};
