//! Filesystem-backed object store.
//!
//! Each key maps to a file below the root directory (key `a/b|:|1.json`
//! lives at `<root>/a/b|:|1.json`). Content types are kept in JSON sidecars
//! under `<root>/.meta/`, which listing never reports.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Directory under the root holding content-type sidecars.
const META_DIR: &str = ".meta";

/// Content type reported for objects whose sidecar is missing.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Serialize, Deserialize)]
struct ObjectMeta {
    content_type: String,
}

/// Object store rooted at a local directory.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative(key: &str) -> StoreResult<PathBuf> {
        let invalid = |reason: &str| StoreError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        let mut rel = PathBuf::new();
        for part in key.split('/') {
            match part {
                "" => return Err(invalid("key must be relative with no empty segments")),
                "." | ".." => return Err(invalid("key must not contain '.' or '..' segments")),
                META_DIR => return Err(invalid("reserved path segment")),
                part => rel.push(part),
            }
        }
        Ok(rel)
    }

    fn data_path(&self, key: &str) -> StoreResult<PathBuf> {
        Ok(self.root.join(Self::relative(key)?))
    }

    fn meta_path(&self, key: &str) -> StoreResult<PathBuf> {
        let mut path = self.root.join(META_DIR).join(Self::relative(key)?);
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".meta.json");
        path.set_file_name(name);
        Ok(path)
    }

    async fn read_content_type(&self, key: &str) -> StoreResult<String> {
        match tokio::fs::read(self.meta_path(key)?).await {
            Ok(raw) => {
                let meta: ObjectMeta = serde_json::from_slice(&raw)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(meta.content_type)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key, "no content-type sidecar, using fallback");
                Ok(FALLBACK_CONTENT_TYPE.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_file(path: &Path, data: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, data).await?;
    Ok(())
}

async fn remove_file(path: &Path) -> StoreResult<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Walk `root`, returning `/`-joined keys starting with `prefix`.
fn walk_keys(root: &Path, prefix: &str) -> StoreResult<Vec<String>> {
    // Only descend into the deepest directory the prefix pins down.
    let dir_part = match prefix.rfind('/') {
        Some(idx) => &prefix[..idx],
        None => "",
    };
    let start = if dir_part.is_empty() {
        root.to_path_buf()
    } else {
        root.join(dir_part.split('/').collect::<PathBuf>())
    };
    if !start.is_dir() {
        return Ok(Vec::new());
    }

    let meta_root = root.join(META_DIR);
    let mut keys = Vec::new();
    let walker = WalkDir::new(&start)
        .into_iter()
        .filter_entry(|entry| entry.path() != meta_root);
    for entry in walker {
        let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let parts: Vec<&str> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        let key = parts.join("/");
        if key.starts_with(prefix) {
            keys.push(key);
        }
    }
    keys.sort();
    Ok(keys)
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        let data = match tokio::fs::read(self.data_path(key)?).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let content_type = self.read_content_type(key).await?;
        Ok(Some(StoredObject::new(data, content_type)))
    }

    async fn put(&self, key: &str, object: StoredObject) -> StoreResult<()> {
        let meta = serde_json::to_vec(&ObjectMeta {
            content_type: object.content_type.clone(),
        })
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
        write_file(&self.meta_path(key)?, &meta).await?;
        write_file(&self.data_path(key)?, &object.data).await
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let root = self.root.clone();
        let prefix = prefix.to_string();
        tokio::task::spawn_blocking(move || walk_keys(&root, &prefix))
            .await
            .map_err(|e| StoreError::Unavailable(format!("listing task failed: {e}")))?
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let existed = remove_file(&self.data_path(key)?).await?;
        remove_file(&self.meta_path(key)?).await?;
        Ok(existed)
    }
}
