use std::collections::BTreeSet;

use crate::snapshot::NamespaceSnapshot;

/// Distinct display names in a snapshot.
///
/// Only uniqueness is part of the contract; the sorted order is a
/// convenience for presentation.
pub fn project(snapshot: &NamespaceSnapshot) -> Vec<String> {
    snapshot
        .iter()
        .map(|key| key.name())
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
