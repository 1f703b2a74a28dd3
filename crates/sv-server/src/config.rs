use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sv_namespace::NamespaceConfig;
use sv_store::{FsObjectStore, InMemoryObjectStore, ObjectStore};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub namespace: NamespaceConfig,
    pub store: StoreConfig,
    /// `*` for any origin, otherwise one exact origin.
    pub cors_allow_origin: String,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            namespace: NamespaceConfig::default(),
            store: StoreConfig::default(),
            cors_allow_origin: "*".into(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

/// Which object store backs the namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    #[default]
    Memory,
    Filesystem {
        root: PathBuf,
    },
}

impl StoreConfig {
    pub fn open(&self) -> Arc<dyn ObjectStore> {
        match self {
            Self::Memory => Arc::new(InMemoryObjectStore::new()),
            Self::Filesystem { root } => Arc::new(FsObjectStore::new(root.clone())),
        }
    }
}
