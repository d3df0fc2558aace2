//! DocumentStore: typed whole-document load/save over a backend
//!
//! ## Design
//!
//! - Documents are replaced wholesale; a reader sees the fully-old or the
//!   fully-new value.
//! - Writes to one key are serialized through the [`LockTable`]: at most one
//!   save per key is in flight and queued saves run in arrival order.
//! - `load` creates the document lazily: if nothing is stored, the default is
//!   persisted (under the key's lock) and returned.
//!
//! ## Held-lock API
//!
//! The transactional layer takes the lock itself and then uses
//! [`DocumentStore::load_held`], [`DocumentStore::save_held`] and
//! [`WriteBatch`]. Each takes a [`KeyGuard`] as proof that the caller holds the
//! key.

use crate::backend::DocumentBackend;
use crate::codec;
use crate::lock::{KeyGuard, LockTable, DEFAULT_LOCK_TIMEOUT};
use crate::sharded::ShardedBackend;
use gamevault_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Typed document store
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
    locks: LockTable,
}

impl DocumentStore {
    /// Create a store over `backend` with the given lock wait bound
    pub fn new(backend: Arc<dyn DocumentBackend>, lock_timeout: Duration) -> Self {
        Self {
            backend,
            locks: LockTable::new(lock_timeout),
        }
    }

    /// In-memory store with the default lock timeout
    pub fn in_memory() -> Self {
        Self::new(Arc::new(ShardedBackend::new()), DEFAULT_LOCK_TIMEOUT)
    }

    /// Underlying backend
    pub fn backend(&self) -> &Arc<dyn DocumentBackend> {
        &self.backend
    }

    /// Lock table
    pub fn locks(&self) -> &LockTable {
        &self.locks
    }

    // ========================================================================
    // Locking
    // ========================================================================

    /// Acquire the write lock on `key`
    pub fn lock(&self, key: &str) -> Result<KeyGuard> {
        self.locks.acquire(key)
    }

    /// Acquire several write locks in global key order
    pub fn lock_many(&self, keys: &[&str]) -> Result<Vec<KeyGuard>> {
        self.locks.acquire_many(keys)
    }

    // ========================================================================
    // Unlocked API
    // ========================================================================

    /// Load `key`, persisting and returning `default()` if absent
    pub fn load<T, F>(&self, key: &str, default: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(bytes) = self.backend.get(key)? {
            return codec::decode(key, &bytes);
        }
        let guard = self.lock(key)?;
        self.load_held(&guard, default)
    }

    /// Load `key` without creating it
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key)? {
            Some(bytes) => codec::decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Replace the document under `key`
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let guard = self.lock(key)?;
        self.save_held(&guard, value)
    }

    /// Whether a document is stored under `key`
    pub fn exists(&self, key: &str) -> Result<bool> {
        self.backend.contains(key)
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        self.backend.keys()
    }

    /// Flush the backend
    pub fn flush(&self) -> Result<()> {
        self.backend.flush()
    }

    // ========================================================================
    // Held-lock API
    // ========================================================================

    /// Load the document `guard` holds, persisting `default()` if absent
    pub fn load_held<T, F>(&self, guard: &KeyGuard, default: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let key = guard.key();
        match self.backend.get(key)? {
            Some(bytes) => codec::decode(key, &bytes),
            None => {
                let value = default();
                self.save_held(guard, &value)?;
                Ok(value)
            }
        }
    }

    /// Replace the document `guard` holds
    pub fn save_held<T: Serialize>(&self, guard: &KeyGuard, value: &T) -> Result<()> {
        let key = guard.key();
        let bytes = codec::encode(value)?;
        self.backend.put(key, bytes).map_err(|e| {
            error!(key, backend = self.backend.name(), error = %e, "document save failed");
            e
        })
    }

    /// Write every document in `batch` as one unit
    pub fn commit_batch(&self, batch: WriteBatch<'_>) -> Result<()> {
        if batch.entries.is_empty() {
            return Ok(());
        }
        let keys: Vec<String> = batch.entries.iter().map(|(k, _)| k.clone()).collect();
        self.backend.put_batch(batch.entries).map_err(|e| {
            error!(?keys, backend = self.backend.name(), error = %e, "batch save failed");
            e
        })
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("backend", &self.backend.name())
            .field("locks", &self.locks)
            .finish()
    }
}

/// Documents to be written together
///
/// Borrowing the guards ties the batch's lifetime to the locks it writes under.
#[derive(Default)]
pub struct WriteBatch<'g> {
    entries: Vec<(String, Vec<u8>)>,
    _guards: PhantomData<&'g KeyGuard>,
}

impl<'g> WriteBatch<'g> {
    /// Empty batch
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            _guards: PhantomData,
        }
    }

    /// Stage the document `guard` holds
    pub fn put<T: Serialize>(&mut self, guard: &'g KeyGuard, value: &T) -> Result<()> {
        let key = guard.key();
        if self.entries.iter().any(|(k, _)| k == key) {
            return Err(Error::Internal(format!("'{}' staged twice in one batch", key)));
        }
        self.entries.push((key.to_string(), codec::encode(value)?));
        Ok(())
    }

    /// Number of staged documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
