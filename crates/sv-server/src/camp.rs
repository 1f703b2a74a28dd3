//! Camps: small JSON records shared by a party, addressed by a short code.
//!
//! A camp is stored as `camps/<code>.json`, where the code is six characters
//! drawn from `A-Z0-9`. Codes are minted on create and are the only lookup
//! handle.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sv_store::{ObjectStore, StoredObject};

use crate::error::{ServerError, ServerResult};

/// Key prefix for camp records.
pub const CAMP_PREFIX: &str = "camps/";

/// Length of a camp code.
pub const CODE_LEN: usize = 6;

const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fresh codes tried before giving up on a crowded code space.
const MAX_CODE_ATTEMPTS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampDetails {
    pub name: String,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    pub details: CampDetails,
}

/// Mint a random camp code.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARS[rng.gen_range(0..CODE_CHARS.len())] as char)
        .collect()
}

pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

pub fn camp_key(code: &str) -> String {
    format!("{CAMP_PREFIX}{code}.json")
}

/// Creates and fetches camps in an object store.
#[derive(Clone)]
pub struct CampRegistry {
    store: Arc<dyn ObjectStore>,
}

impl CampRegistry {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Create a camp named `name` under a freshly minted, unused code.
    pub async fn create(&self, name: &str) -> ServerResult<Camp> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServerError::BadRequest("Camp name is required".into()));
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code();
            let key = camp_key(&code);
            if self.store.exists(&key).await? {
                tracing::debug!(code = %code, "camp code taken, drawing another");
                continue;
            }
            let camp = Camp {
                details: CampDetails {
                    name: name.to_string(),
                    code,
                },
            };
            let body = serde_json::to_vec(&camp).map_err(|e| ServerError::Internal(e.to_string()))?;
            self.store.put(&key, StoredObject::json(body)).await?;
            tracing::info!(code = %camp.details.code, name = %name, "camp created");
            return Ok(camp);
        }
        Err(ServerError::Internal(
            "could not allocate an unused camp code".into(),
        ))
    }

    /// Fetch the stored camp record for `code`.
    pub async fn get(&self, code: &str) -> ServerResult<StoredObject> {
        if !is_valid_code(code) {
            return Err(ServerError::BadRequest(format!("invalid camp code {code:?}")));
        }
        self.store
            .get(&camp_key(code))
            .await?
            .ok_or_else(|| ServerError::NotFound("Camp not found".into()))
    }
}

impl std::fmt::Debug for CampRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampRegistry")
            .field("prefix", &CAMP_PREFIX)
            .finish()
    }
}
