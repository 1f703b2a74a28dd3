use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// Flat key-value object store.
///
/// All implementations must satisfy these invariants:
/// - Keys are opaque strings; `/` has no meaning beyond prefix matching.
/// - `put` overwrites unconditionally and is idempotent.
/// - A call that returns `Ok` has taken effect; callers sequence dependent
///   operations (copy, then delete) on that confirmation.
/// - Calls are independent: there is no isolation between a `list` and a
///   later mutation.
/// - All I/O errors are propagated, never silently ignored, and never retried.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read an object by key.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>>;

    /// Write (create or replace) an object.
    async fn put(&self, key: &str, object: StoredObject) -> StoreResult<()>;

    /// List every key that starts with `prefix`.
    ///
    /// Ordering is backend-defined.
    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Delete an object by key. Returns `true` if the object existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Copy the object at `src` to `dst`, content type included.
    ///
    /// Fails with [`StoreError::NotFound`] if `src` does not exist. The
    /// default implementation is a get followed by a put.
    async fn copy(&self, src: &str, dst: &str) -> StoreResult<()> {
        let object = self
            .get(src)
            .await?
            .ok_or_else(|| StoreError::NotFound(src.to_string()))?;
        self.put(dst, object).await
    }

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
