//! Document encoding
//!
//! Documents are MessagePack maps (named fields) so that adding a field with
//! `#[serde(default)]` does not invalidate stored documents.

use gamevault_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a document
pub fn encode<T: Serialize>(doc: &T) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(doc).map_err(|e| Error::StorageIo(format!("encode failed: {}", e)))
}

/// Decode a document stored under `key`
pub fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    rmp_serde::from_slice(bytes)
        .map_err(|e| Error::StorageIo(format!("corrupt document '{}': {}", key, e)))
}
