//! Transactional read-modify-write over the document store
//!
//! Every mutation of a document goes through [`TransactionalUpdater`], which
//! makes "load, mutate, save" one unit per key:
//!
//! ```text
//! 1. acquire the key's lock (FIFO, bounded wait → Busy)
//! 2. load the document (or persist the default)
//! 3. mutate(&mut doc) → Result<R>
//! 4. IF Err: discard the mutated copy, return the error
//! 5. save the document wholesale
//! 6. release the lock (guard drop, on every path)
//! ```
//!
//! Updates to one key are totally ordered and no two closures ever see the
//! same "before" state, which rules out lost updates.
//!
//! ## Hazard: re-entrancy
//!
//! A closure must not start another update on a key it already holds. The
//! lock table detects this and the inner call fails with `Internal` rather
//! than deadlocking. Multi-key work must go through
//! [`TransactionalUpdater::run_update_pair`], which acquires keys in global
//! order.

use gamevault_core::{Error, Result};
use gamevault_storage::{DocumentStore, KeyGuard, WriteBatch};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counters for committed and aborted updates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateMetrics {
    /// Updates whose result was persisted
    pub committed: u64,
    /// Updates discarded (closure error, lock timeout, storage failure)
    pub aborted: u64,
}

/// Serialized read-modify-write of documents
pub struct TransactionalUpdater {
    store: Arc<DocumentStore>,
    committed: AtomicU64,
    aborted: AtomicU64,
}

impl TransactionalUpdater {
    /// Create an updater over `store`
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            committed: AtomicU64::new(0),
            aborted: AtomicU64::new(0),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Snapshot of the counters
    pub fn metrics(&self) -> UpdateMetrics {
        UpdateMetrics {
            committed: self.committed.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
        }
    }

    fn record<R>(&self, key: &str, outcome: Result<R>) -> Result<R> {
        match &outcome {
            Ok(_) => {
                self.committed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.aborted.fetch_add(1, Ordering::Relaxed);
                debug!(key, code = e.reason_code(), "update aborted, mutation discarded");
            }
        }
        outcome
    }

    /// Run `mutate` on the document under `key` as one unit
    ///
    /// # Errors
    ///
    /// - whatever `mutate` returns (nothing is persisted)
    /// - `Busy` if the lock is not acquired in time
    /// - `StorageIo` if loading or saving fails
    /// - `Internal` on re-entrant use of a held key
    pub fn run_update<T, D, F, R>(&self, key: &str, default: D, mutate: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        D: FnOnce() -> T,
        F: FnOnce(&mut T) -> Result<R>,
    {
        let outcome = (|| -> Result<R> {
            let guard = self.store.lock(key)?;
            let mut doc = self.store.load_held(&guard, default)?;
            let result = mutate(&mut doc)?;
            self.store.save_held(&guard, &doc)?;
            Ok(result)
        })();
        self.record(key, outcome)
    }

    /// Run `mutate` on two documents as one unit
    ///
    /// Both locks are taken in global key order regardless of argument order,
    /// and both documents are persisted through a single batch write.
    ///
    /// # Errors
    ///
    /// As [`run_update`](Self::run_update), plus:
    /// - `Validation` if the keys are equal
    /// - `Internal` if a durable backend committed the batch but could not
    ///   apply it yet; the batch is kept and must not be retried
    pub fn run_update_pair<A, B, DA, DB, F, R>(
        &self,
        key_a: &str,
        key_b: &str,
        default_a: DA,
        default_b: DB,
        mutate: F,
    ) -> Result<R>
    where
        A: Serialize + DeserializeOwned,
        B: Serialize + DeserializeOwned,
        DA: FnOnce() -> A,
        DB: FnOnce() -> B,
        F: FnOnce(&mut A, &mut B) -> Result<R>,
    {
        if key_a == key_b {
            return Err(Error::Validation(format!(
                "pair update needs two distinct documents, got '{}' twice",
                key_a
            )));
        }

        let outcome = (|| -> Result<R> {
            let guards = self.store.lock_many(&[key_a, key_b])?;
            let (guard_a, guard_b) = split_guards(&guards, key_a)?;

            let mut a = self.store.load_held(guard_a, default_a)?;
            let mut b = self.store.load_held(guard_b, default_b)?;
            let result = mutate(&mut a, &mut b)?;

            let mut batch = WriteBatch::new();
            batch.put(guard_a, &a)?;
            batch.put(guard_b, &b)?;
            self.store.commit_batch(batch)?;
            Ok(result)
        })();
        self.record(key_a, outcome)
    }
}

fn split_guards<'g>(guards: &'g [KeyGuard], key_a: &str) -> Result<(&'g KeyGuard, &'g KeyGuard)> {
    match guards {
        [first, second] if first.key() == key_a => Ok((first, second)),
        [first, second] => Ok((second, first)),
        _ => Err(Error::Internal(format!(
            "expected two guards, got {}",
            guards.len()
        ))),
    }
}

impl std::fmt::Debug for TransactionalUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalUpdater")
            .field("store", &self.store)
            .field("metrics", &self.metrics())
            .finish()
    }
}
