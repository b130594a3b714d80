//! Persistence collaborator seam
//!
//! The engine talks to persistence through a generic request/response
//! interface: GET and PUT of a named JSON configuration resource. Transport
//! details (HTTP, retries, auth) belong to the implementation behind the
//! trait, never to the engine.

mod file;

pub use file::FileStore;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Generic configuration resource store.
///
/// `get` returning `Ok(None)` means the resource was never persisted;
/// callers substitute defaults. There is no partial-update operation; `put`
/// always writes the whole document.
pub trait SettingsStore {
    fn get(&self, resource: &str) -> Result<Option<Value>, StoreError>;
    fn put(&self, resource: &str, document: &Value) -> Result<(), StoreError>;
}

/// Collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("resource unreachable: {0}")]
    Unreachable(String),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// SHA-256 digest of the canonical (JCS) serialization of a document.
///
/// Canonicalization keeps the digest stable across key ordering; it can
/// only fail on non-finite numbers, which parsed JSON cannot contain.
pub fn document_digest(document: &Value) -> String {
    let canonical = serde_json_canonicalizer::to_vec(document).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    hex::encode(hasher.finalize())
}
