//! Sharded in-memory backend
//!
//! DashMap-backed: reads take a shard read lock, writes lock only the
//! target shard. Documents are held as `Arc<[u8]>` so a read clones a
//! pointer under the shard lock and copies outside it.
//!
//! `put_batch` holds the batch gate exclusively while inserting, so a reader
//! sees every document of a batch or none of them.
//!
//! Nothing survives the process. Use the file backend for durability.

use crate::backend::DocumentBackend;
use dashmap::DashMap;
use gamevault_core::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// In-memory document backend
#[derive(Default)]
pub struct ShardedBackend {
    docs: DashMap<String, Arc<[u8]>>,
    batch_gate: RwLock<()>,
}

impl ShardedBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            batch_gate: RwLock::new(()),
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if no documents are stored
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentBackend for ShardedBackend {
    #[inline]
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let _shared = self.batch_gate.read();
        let bytes = self.docs.get(key).map(|entry| Arc::clone(entry.value()));
        Ok(bytes.map(|b| b.to_vec()))
    }

    #[inline]
    fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let _shared = self.batch_gate.read();
        self.docs.insert(key.to_string(), Arc::from(bytes));
        Ok(())
    }

    fn put_batch(&self, entries: Vec<(String, Vec<u8>)>) -> Result<()> {
        // Inserts cannot fail, so the batch is all-or-nothing.
        let _exclusive = self.batch_gate.write();
        for (key, bytes) in entries {
            self.docs.insert(key, Arc::from(bytes));
        }
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.docs.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.docs.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for ShardedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedBackend")
            .field("documents", &self.len())
            .finish()
    }
}
