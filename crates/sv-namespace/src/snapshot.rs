//! Point-in-time view of every sheet key under the namespace prefix.

use sv_keys::{CompositeKey, KeyCodec};
use sv_store::ObjectStore;

use crate::error::NamespaceResult;

/// Decoded keys as listed by the store, in store order.
///
/// A snapshot is read fresh for every operation and never cached; it may
/// contain the same key twice if the backend's listing does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceSnapshot {
    entries: Vec<CompositeKey>,
}

impl NamespaceSnapshot {
    /// Build a snapshot from already-decoded keys.
    pub fn new(entries: Vec<CompositeKey>) -> Self {
        Self { entries }
    }

    /// The decoded entries.
    pub fn entries(&self) -> &[CompositeKey] {
        &self.entries
    }

    /// Iterate over the decoded entries.
    pub fn iter(&self) -> std::slice::Iter<'_, CompositeKey> {
        self.entries.iter()
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored under the prefix.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a NamespaceSnapshot {
    type Item = &'a CompositeKey;
    type IntoIter = std::slice::Iter<'a, CompositeKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Decode raw listed keys, dropping any that are malformed or nameless.
pub fn decode_listing<I, S>(codec: &KeyCodec, keys: I) -> NamespaceSnapshot
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let entries = keys
        .into_iter()
        .filter_map(|raw| match codec.decode(raw.as_ref()) {
            Ok(key) if key.name().is_empty() => {
                tracing::debug!(key = key.as_str(), "skipping key with empty display name");
                None
            }
            Ok(key) => Some(key),
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable key");
                None
            }
        })
        .collect();
    NamespaceSnapshot::new(entries)
}

/// List and decode every key under the codec's prefix.
pub async fn list_snapshot(
    store: &dyn ObjectStore,
    codec: &KeyCodec,
) -> NamespaceResult<NamespaceSnapshot> {
    let keys = store.list(codec.prefix()).await?;
    Ok(decode_listing(codec, keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_store::{InMemoryObjectStore, StoredObject};

    #[test]
    fn decode_listing_skips_noise() {
        let codec = KeyCodec::default();
        let snapshot = decode_listing(
            &codec,
            [
                "character-sheets/Alice|:|id1.json",
                "character-sheets/readme.txt",
                "character-sheets/|:|orphan.json",
                "character-sheets/Alice|:|.json",
                "character-sheets/A|:|B|:|C.json",
                "character-sheets/Bob|:|id2",
            ],
        );
        let names: Vec<&str> = snapshot.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn decode_listing_keeps_duplicates() {
        let codec = KeyCodec::default();
        let key = "character-sheets/Alice|:|id1.json";
        let snapshot = decode_listing(&codec, [key, key]);
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn list_snapshot_reads_only_the_prefix() {
        let store = InMemoryObjectStore::new();
        let codec = KeyCodec::default();
        store
            .put("character-sheets/Alice|:|id1.json", StoredObject::json(&b"{}"[..]))
            .await
            .unwrap();
        store
            .put("camps/Alice|:|id9.json", StoredObject::json(&b"{}"[..]))
            .await
            .unwrap();

        let snapshot = list_snapshot(&store, &codec).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.entries()[0].id(), "id1");
    }

    #[tokio::test]
    async fn empty_store_gives_empty_snapshot() {
        let store = InMemoryObjectStore::new();
        let snapshot = list_snapshot(&store, &KeyCodec::default()).await.unwrap();
        assert!(snapshot.is_empty());
    }
}
