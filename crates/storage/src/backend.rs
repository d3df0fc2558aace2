//! Backend trait for raw document bytes
//!
//! A backend stores opaque encoded documents by key. It does no locking of its
//! own beyond what makes a single `get`/`put` atomic: a `get` returns either
//! the old or the new bytes of a concurrent `put`, never a mix. Write
//! serialization per key is the job of [`crate::LockTable`].

use gamevault_core::Result;

/// Durable (or in-memory) key → bytes storage
pub trait DocumentBackend: Send + Sync {
    /// Read the bytes stored under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the bytes stored under `key`
    fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Replace several documents as one unit
    ///
    /// Either every entry becomes durable or, after recovery, none does.
    fn put_batch(&self, entries: Vec<(String, Vec<u8>)>) -> Result<()>;

    /// Whether `key` has a stored document
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// All stored keys, sorted
    fn keys(&self) -> Result<Vec<String>>;

    /// Force buffered writes to stable storage
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Short name for logs
    fn name(&self) -> &'static str;
}
