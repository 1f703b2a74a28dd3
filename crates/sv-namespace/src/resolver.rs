//! Classification of a save request against a namespace snapshot.
//!
//! The decision is a pure function of the snapshot and the requested key.
//! First match wins:
//!
//! | identifier known            | name held by another id | action       |
//! |-----------------------------|-------------------------|--------------|
//! | no                          | no                      | `Create`     |
//! | no                          | yes                     | `Conflict`   |
//! | yes, under requested name   | -                       | `NoopUpdate` |
//! | yes, under another name     | no                      | `Rename`     |
//! | yes, under another name     | yes                     | `Conflict`   |
//!
//! A snapshot in which the requested name is already held by two different
//! identifiers is corrupt and yields [`NamespaceError::InvariantViolation`].
//!
//! An identifier listed under several keys (a rename interrupted between its
//! write and its delete) is healed here: every key of that identifier other
//! than the one being written comes back as `stale`.

use std::collections::BTreeSet;

use sv_keys::CompositeKey;

use crate::error::{NamespaceError, NamespaceResult};
use crate::snapshot::NamespaceSnapshot;

/// What a save must do to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveAction {
    /// Neither the name nor the identifier is in use.
    Create { key: CompositeKey },
    /// The identifier already lives under the requested name.
    NoopUpdate {
        key: CompositeKey,
        stale: Vec<CompositeKey>,
    },
    /// The name belongs to a different identifier. No mutation.
    Conflict { name: String, owner: CompositeKey },
    /// The identifier lives under another name and moves to the requested
    /// one.
    Rename {
        from: CompositeKey,
        to: CompositeKey,
        stale: Vec<CompositeKey>,
    },
}

impl SaveAction {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::NoopUpdate { .. } => "update",
            Self::Conflict { .. } => "conflict",
            Self::Rename { .. } => "rename",
        }
    }
}

/// Decide how to save `target` given the current `snapshot`.
pub fn resolve(snapshot: &NamespaceSnapshot, target: &CompositeKey) -> NamespaceResult<SaveAction> {
    let name = target.name();
    let id = target.id();

    let holders: BTreeSet<&str> = snapshot
        .iter()
        .filter(|e| e.name() == name)
        .map(|e| e.id())
        .collect();
    if holders.len() > 1 {
        return Err(NamespaceError::InvariantViolation {
            name: name.to_string(),
            detail: format!(
                "display name held by {} identifiers: {}",
                holders.len(),
                holders.into_iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    let rival = snapshot.iter().find(|e| e.name() == name && e.id() != id);
    let own: Vec<&CompositeKey> = snapshot.iter().filter(|e| e.id() == id).collect();

    if let Some(owner) = rival {
        return Ok(SaveAction::Conflict {
            name: name.to_string(),
            owner: owner.clone(),
        });
    }

    let Some(first) = own.first() else {
        return Ok(SaveAction::Create {
            key: target.clone(),
        });
    };

    if own.iter().any(|e| e.name() == name) {
        return Ok(SaveAction::NoopUpdate {
            key: target.clone(),
            stale: stale_keys(&own, &[target.as_str()]),
        });
    }

    let from = (*first).clone();
    let stale = stale_keys(&own, &[target.as_str(), from.as_str()]);
    Ok(SaveAction::Rename {
        from,
        to: target.clone(),
        stale,
    })
}

/// Distinct keys among `own` other than those in `keep`, in snapshot order.
fn stale_keys(own: &[&CompositeKey], keep: &[&str]) -> Vec<CompositeKey> {
    let mut seen = BTreeSet::new();
    let mut stale = Vec::new();
    for entry in own.iter().copied() {
        let raw = entry.as_str();
        if !keep.contains(&raw) && seen.insert(raw) {
            stale.push(entry.clone());
        }
    }
    stale
}
