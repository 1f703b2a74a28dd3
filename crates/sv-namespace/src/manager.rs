use std::sync::Arc;

use bytes::Bytes;
use sv_keys::{CompositeKey, KeyCodec};
use sv_store::{ObjectStore, StoredObject};

use crate::config::NamespaceConfig;
use crate::error::{NamespaceError, NamespaceResult};
use crate::executor::{execute, SaveOutcome};
use crate::matcher::match_query;
use crate::projector::project;
use crate::resolver::resolve;
use crate::snapshot::{list_snapshot, NamespaceSnapshot};

/// A sheet as returned by [`NamespaceManager::load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedSheet {
    /// The stored key the query resolved to.
    pub key: CompositeKey,
    /// The payload, verbatim.
    pub body: Bytes,
    /// The caller's override if given, else the stored content type.
    pub content_type: String,
}

/// Save, load and list character sheets under one namespace prefix.
///
/// The manager keeps no state beyond its configuration: every operation
/// lists the namespace afresh, decides, and then issues its store calls.
/// Between the listing and the mutation nothing is isolated, so two
/// concurrent saves touching the same name or identifier can lose an update
/// or see a spurious conflict. The workload is expected to have a single
/// writer per sheet.
pub struct NamespaceManager {
    store: Arc<dyn ObjectStore>,
    codec: KeyCodec,
    config: NamespaceConfig,
}

impl NamespaceManager {
    /// Create a manager over `store`.
    pub fn new(store: Arc<dyn ObjectStore>, config: NamespaceConfig) -> NamespaceResult<Self> {
        let codec = KeyCodec::new(config.prefix.clone())?;
        Ok(Self {
            store,
            codec,
            config,
        })
    }

    /// Create a manager with the default configuration.
    pub fn with_defaults(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            codec: KeyCodec::default(),
            config: NamespaceConfig::default(),
        }
    }

    /// The backing object store.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// The key codec for this namespace.
    pub fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    /// The active configuration.
    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Read a fresh snapshot of the namespace.
    pub async fn snapshot(&self) -> NamespaceResult<NamespaceSnapshot> {
        list_snapshot(self.store.as_ref(), &self.codec).await
    }

    /// Save `body` as the sheet `(name, id)`.
    ///
    /// Creates, updates in place, or renames depending on what the namespace
    /// already holds; fails with [`NamespaceError::Conflict`] if another
    /// identifier owns `name`. `None` stores the configured default content
    /// type.
    pub async fn save(
        &self,
        name: &str,
        id: &str,
        body: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> NamespaceResult<SaveOutcome> {
        let target = self.codec.encode(name, id)?;
        let snapshot = self.snapshot().await?;
        let action = resolve(&snapshot, &target).inspect_err(|e| {
            tracing::warn!(key = %target, error = %e, "refusing to save over corrupt namespace");
        })?;
        tracing::debug!(key = %target, action = action.label(), "resolved save");

        let content_type = content_type.unwrap_or(&self.config.default_content_type);
        let object = StoredObject::new(body, content_type);
        execute(self.store.as_ref(), action, object, self.config.rename_policy).await
    }

    /// Save using a composite key such as `"Alice|:|id1.json"`.
    ///
    /// The key may omit the namespace prefix and the `.json` suffix.
    pub async fn save_by_key(
        &self,
        key: &str,
        body: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> NamespaceResult<SaveOutcome> {
        let qualified = if key.starts_with(self.codec.prefix()) {
            key.to_string()
        } else {
            format!("{}{key}", self.codec.prefix())
        };
        let parsed = self.codec.decode(&qualified)?;
        self.save(parsed.name(), parsed.id(), body, content_type).await
    }

    /// Load the one sheet `query` resolves to.
    pub async fn load(&self, query: &str, content_type: Option<&str>) -> NamespaceResult<LoadedSheet> {
        let snapshot = self.snapshot().await?;
        let key = match_query(&snapshot, &self.codec, query)?.clone();
        let object = self
            .store
            .get(key.as_str())
            .await?
            .ok_or_else(|| NamespaceError::NotFound {
                query: query.to_string(),
            })?;
        tracing::debug!(key = %key, size = object.size(), "loaded character sheet");

        Ok(LoadedSheet {
            key,
            body: object.data,
            content_type: content_type
                .map(str::to_string)
                .unwrap_or(object.content_type),
        })
    }

    /// Distinct display names currently stored.
    pub async fn list(&self) -> NamespaceResult<Vec<String>> {
        Ok(project(&self.snapshot().await?))
    }
}

impl std::fmt::Debug for NamespaceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceManager")
            .field("prefix", &self.codec.prefix())
            .field("rename_policy", &self.config.rename_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenamePolicy;
    use crate::executor::SaveStatus;
    use sv_store::InMemoryObjectStore;

    fn manager() -> (Arc<InMemoryObjectStore>, NamespaceManager) {
        let store = Arc::new(InMemoryObjectStore::new());
        let manager = NamespaceManager::with_defaults(store.clone());
        (store, manager)
    }

    #[tokio::test]
    async fn save_then_load_by_name() {
        let (_store, m) = manager();
        let saved = m.save("Alice", "id1", "{\"hp\":9}", None).await.unwrap();
        assert_eq!(saved.status, SaveStatus::Created);

        let sheet = m.load("Alice", None).await.unwrap();
        assert_eq!(&sheet.body[..], b"{\"hp\":9}");
        assert_eq!(sheet.content_type, "application/json");
        assert_eq!(sheet.key, saved.key);
    }

    #[tokio::test]
    async fn load_content_type_override() {
        let (_store, m) = manager();
        m.save("Alice", "id1", "x", Some("text/plain")).await.unwrap();
        assert_eq!(m.load("Alice", None).await.unwrap().content_type, "text/plain");
        assert_eq!(
            m.load("Alice", Some("application/json")).await.unwrap().content_type,
            "application/json"
        );
    }

    #[tokio::test]
    async fn save_by_key_accepts_short_and_full_forms() {
        let (store, m) = manager();
        let a = m.save_by_key("Alice|:|id1.json", "1", None).await.unwrap();
        assert_eq!(a.key.as_str(), "character-sheets/Alice|:|id1.json");

        let b = m
            .save_by_key("character-sheets/Alice|:|id1.json", "2", None)
            .await
            .unwrap();
        assert_eq!(b.status, SaveStatus::Updated);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn save_by_key_rejects_malformed() {
        let (_store, m) = manager();
        let err = m.save_by_key("Alice.json", "1", None).await.unwrap_err();
        assert!(matches!(err, NamespaceError::MalformedKey { .. }));
    }

    #[tokio::test]
    async fn save_rejects_invalid_name_before_touching_store() {
        let (store, m) = manager();
        let err = m.save("A|:|B", "id1", "x", None).await.unwrap_err();
        assert!(matches!(err, NamespaceError::InvalidName { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn custom_prefix_and_policy() {
        let store = Arc::new(InMemoryObjectStore::new());
        let config = NamespaceConfig {
            prefix: "sheets".into(),
            rename_policy: RenamePolicy::CopyPrevious,
            ..Default::default()
        };
        let m = NamespaceManager::new(store.clone(), config).unwrap();
        m.save("Alice", "id1", "v1", None).await.unwrap();
        m.save("Bob", "id1", "v2", None).await.unwrap();

        assert_eq!(store.all_keys(), vec!["sheets/Bob|:|id1.json".to_string()]);
        assert_eq!(&m.load("Bob", None).await.unwrap().body[..], b"v1");
    }

    #[test]
    fn bad_prefix_is_a_config_error() {
        let config = NamespaceConfig {
            prefix: "a|:|b".into(),
            ..Default::default()
        };
        let err = NamespaceManager::new(Arc::new(InMemoryObjectStore::new()), config).unwrap_err();
        assert!(matches!(err, NamespaceError::Config(_)));
    }
}
