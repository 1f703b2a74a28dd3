use std::collections::BTreeSet;

use sv_keys::{CompositeKey, KeyCodec, KEY_SUFFIX};

use crate::error::{NamespaceError, NamespaceResult};
use crate::snapshot::NamespaceSnapshot;

/// Find the single stored key a load query refers to.
///
/// The query may be a full composite key, a key without its `.json` suffix,
/// or a bare display-name prefix. Every stored key starting with the
/// normalized query is a candidate; the query must resolve to exactly one.
///
/// A candidate whose stored key equals the query wins outright. Candidates
/// that all decode to the same name and identifier (a sheet still stored
/// under its legacy unsuffixed key beside the current one) count as one,
/// and the suffixed key is returned.
pub fn match_query<'a>(
    snapshot: &'a NamespaceSnapshot,
    codec: &KeyCodec,
    query: &str,
) -> NamespaceResult<&'a CompositeKey> {
    if query.is_empty() {
        return Err(NamespaceError::NotFound {
            query: query.to_string(),
        });
    }
    let needle = codec.normalize_query(query);

    let mut seen = BTreeSet::new();
    let candidates: Vec<&CompositeKey> = snapshot
        .iter()
        .filter(|key| key.as_str().starts_with(&needle))
        .filter(|key| seen.insert(key.as_str().to_string()))
        .collect();

    let exact = if query.ends_with(KEY_SUFFIX) {
        format!("{needle}{KEY_SUFFIX}")
    } else {
        needle.clone()
    };
    if let Some(hit) = candidates.iter().find(|key| key.as_str() == exact) {
        return Ok(*hit);
    }

    if let Some((first, rest)) = candidates.split_first() {
        if rest
            .iter()
            .all(|key| key.name() == first.name() && key.id() == first.id())
        {
            let preferred = candidates
                .iter()
                .find(|key| key.as_str().ends_with(KEY_SUFFIX))
                .unwrap_or(first);
            return Ok(*preferred);
        }
    }

    match candidates.as_slice() {
        [] => Err(NamespaceError::NotFound {
            query: query.to_string(),
        }),
        [only] => Ok(*only),
        many => Err(NamespaceError::AmbiguousKey {
            query: query.to_string(),
            candidates: many.iter().map(|k| k.as_str().to_string()).collect(),
        }),
    }
}
