//! Applies a [`SaveAction`] to the object store.
//!
//! Renames are two confirmed steps: write the new key, then delete the old
//! one. The old key is never deleted before the write has returned `Ok`. A
//! failure between the steps leaves both keys in place; the next save of that
//! identifier reports the leftover as stale and removes it.

use serde::{Deserialize, Serialize};
use sv_keys::CompositeKey;
use sv_store::{ObjectStore, StoredObject};

use crate::config::RenamePolicy;
use crate::error::{NamespaceError, NamespaceResult};
use crate::resolver::SaveAction;

/// How a save landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Created,
    Updated,
    Renamed,
}

/// Result of a successful save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub status: SaveStatus,
    pub key: CompositeKey,
}

/// Execute `action`, storing `object` where the action calls for it.
pub async fn execute(
    store: &dyn ObjectStore,
    action: SaveAction,
    object: StoredObject,
    policy: RenamePolicy,
) -> NamespaceResult<SaveOutcome> {
    match action {
        SaveAction::Create { key } => {
            store.put(key.as_str(), object).await?;
            tracing::info!(key = %key, "created character sheet");
            Ok(SaveOutcome {
                status: SaveStatus::Created,
                key,
            })
        }
        SaveAction::NoopUpdate { key, stale } => {
            store.put(key.as_str(), object).await?;
            tracing::info!(key = %key, "updated character sheet");
            remove_stale(store, &stale).await;
            Ok(SaveOutcome {
                status: SaveStatus::Updated,
                key,
            })
        }
        SaveAction::Conflict { name, owner } => {
            tracing::warn!(name = %name, owner = %owner, "display name already taken");
            Err(NamespaceError::Conflict { name })
        }
        SaveAction::Rename { from, to, stale } => {
            match policy {
                RenamePolicy::CopyPrevious => store.copy(from.as_str(), to.as_str()).await?,
                RenamePolicy::WriteSubmitted => store.put(to.as_str(), object).await?,
            }
            store.delete(from.as_str()).await?;
            tracing::info!(from = %from, to = %to, ?policy, "renamed character sheet");
            remove_stale(store, &stale).await;
            Ok(SaveOutcome {
                status: SaveStatus::Renamed,
                key: to,
            })
        }
    }
}

/// Best-effort removal of leftovers from interrupted renames.
///
/// Failures are logged; the keys will be reported stale again next time.
async fn remove_stale(store: &dyn ObjectStore, stale: &[CompositeKey]) {
    for key in stale {
        match store.delete(key.as_str()).await {
            Ok(_) => tracing::info!(key = %key, "removed stale key"),
            Err(e) => tracing::warn!(key = %key, error = %e, "failed to remove stale key"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_keys::KeyCodec;
    use sv_store::InMemoryObjectStore;

    fn key(name: &str, id: &str) -> CompositeKey {
        KeyCodec::default().encode(name, id).unwrap()
    }

    fn body(s: &str) -> StoredObject {
        StoredObject::json(s.as_bytes().to_vec())
    }

    async fn read(store: &InMemoryObjectStore, key: &CompositeKey) -> Option<String> {
        store
            .get(key.as_str())
            .await
            .unwrap()
            .map(|o| String::from_utf8(o.data.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn create_puts_body() {
        let store = InMemoryObjectStore::new();
        let outcome = execute(
            &store,
            SaveAction::Create { key: key("Alice", "id1") },
            body("a"),
            RenamePolicy::default(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.status, SaveStatus::Created);
        assert_eq!(read(&store, &key("Alice", "id1")).await.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn conflict_touches_nothing() {
        let store = InMemoryObjectStore::new();
        let err = execute(
            &store,
            SaveAction::Conflict {
                name: "Alice".into(),
                owner: key("Alice", "id1"),
            },
            body("x"),
            RenamePolicy::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, NamespaceError::Conflict { ref name } if name == "Alice"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rename_write_submitted() {
        let store = InMemoryObjectStore::new();
        store.put(key("Alice", "id1").as_str(), body("old")).await.unwrap();

        let outcome = execute(
            &store,
            SaveAction::Rename {
                from: key("Alice", "id1"),
                to: key("Bob", "id1"),
                stale: vec![],
            },
            body("new"),
            RenamePolicy::WriteSubmitted,
        )
        .await
        .unwrap();
        assert_eq!(outcome.status, SaveStatus::Renamed);
        assert_eq!(outcome.key, key("Bob", "id1"));
        assert_eq!(read(&store, &key("Bob", "id1")).await.as_deref(), Some("new"));
        assert_eq!(read(&store, &key("Alice", "id1")).await, None);
    }

    #[tokio::test]
    async fn rename_copy_previous_drops_submitted_body() {
        let store = InMemoryObjectStore::new();
        store.put(key("Alice", "id1").as_str(), body("old")).await.unwrap();

        execute(
            &store,
            SaveAction::Rename {
                from: key("Alice", "id1"),
                to: key("Bob", "id1"),
                stale: vec![],
            },
            body("new"),
            RenamePolicy::CopyPrevious,
        )
        .await
        .unwrap();
        assert_eq!(read(&store, &key("Bob", "id1")).await.as_deref(), Some("old"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn rename_copy_previous_with_missing_source_keeps_nothing_deleted() {
        let store = InMemoryObjectStore::new();
        let err = execute(
            &store,
            SaveAction::Rename {
                from: key("Alice", "id1"),
                to: key("Bob", "id1"),
                stale: vec![],
            },
            body("new"),
            RenamePolicy::CopyPrevious,
        )
        .await
        .unwrap_err();
        assert!(err.is_retryable());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn update_removes_stale_keys() {
        let store = InMemoryObjectStore::new();
        store.put(key("Alice", "id1").as_str(), body("old")).await.unwrap();
        store.put(key("Bob", "id1").as_str(), body("old")).await.unwrap();

        execute(
            &store,
            SaveAction::NoopUpdate {
                key: key("Bob", "id1"),
                stale: vec![key("Alice", "id1")],
            },
            body("new"),
            RenamePolicy::default(),
        )
        .await
        .unwrap();
        assert_eq!(store.all_keys(), vec![key("Bob", "id1").into_string()]);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SaveStatus::Renamed).unwrap(), "\"renamed\"");
    }
}
