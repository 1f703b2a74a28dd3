use std::sync::Arc;

use axum::http::HeaderValue;
use sv_namespace::NamespaceManager;

use crate::camp::CampRegistry;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub manager: Arc<NamespaceManager>,
    pub camps: CampRegistry,
    /// `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
    pub max_body_bytes: usize,
}

impl AppState {
    /// State with permissive CORS and the default body limit.
    pub fn new(manager: Arc<NamespaceManager>) -> Self {
        let camps = CampRegistry::new(manager.store().clone());
        Self {
            manager,
            camps,
            cors_origin: None,
            max_body_bytes: ServerConfig::default().max_body_bytes,
        }
    }

    /// Open the configured store and build the manager over it.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let manager = NamespaceManager::new(config.store.open(), config.namespace.clone())?;
        let cors_origin = match config.cors_allow_origin.as_str() {
            "*" => None,
            origin => Some(HeaderValue::from_str(origin).map_err(|e| {
                ServerError::Config(format!("invalid cors_allow_origin {origin:?}: {e}"))
            })?),
        };
        Ok(Self {
            camps: CampRegistry::new(manager.store().clone()),
            manager: Arc::new(manager),
            cors_origin,
            max_body_bytes: config.max_body_bytes,
        })
    }
}
