//! Per-key lock table
//!
//! Every document key has its own wait queue, so unrelated documents never
//! serialize against each other.
//!
//! ## Semantics
//!
//! - **Exclusive**: at most one [`KeyGuard`] per key exists at a time.
//! - **FIFO hand-off**: waiters are served in arrival order. A releasing
//!   guard wakes the queue and only the waiter at the front proceeds.
//! - **Bounded wait**: a waiter gives up after the table's timeout and
//!   returns [`Error::Busy`], leaving the queue.
//! - **Scoped release**: the lock is released when the guard drops, on every
//!   exit path including `?` and panics.
//! - **Re-entrancy detection**: acquiring a key already held by the calling
//!   thread fails with [`Error::Internal`] instead of deadlocking.
//!
//! ## Multi-key acquisition
//!
//! [`LockTable::acquire_many`] sorts and deduplicates keys before acquiring,
//! so every multi-key caller uses the same global order and two callers can
//! never wait on each other in a cycle.

use dashmap::DashMap;
use gamevault_core::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default time a caller waits for a document lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct LockState {
    /// Thread currently holding the key
    holder: Option<ThreadId>,
    /// Tickets of waiting callers, front is served next
    queue: VecDeque<u64>,
    next_ticket: u64,
}

#[derive(Debug, Default)]
struct KeyLock {
    state: Mutex<LockState>,
    released: Condvar,
}

/// Table of per-key locks
pub struct LockTable {
    locks: DashMap<String, Arc<KeyLock>>,
    timeout: Duration,
}

impl LockTable {
    /// Create a table whose waits give up after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            timeout,
        }
    }

    /// Configured wait bound
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of keys that have ever been locked
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Check if no key has been locked yet
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn lock_for(&self, key: &str) -> Arc<KeyLock> {
        if let Some(lock) = self.locks.get(key) {
            return Arc::clone(lock.value());
        }
        // The shard guard is dropped at the end of this statement, before any wait.
        Arc::clone(self.locks.entry(key.to_string()).or_default().value())
    }

    /// Acquire the lock on `key`
    ///
    /// # Errors
    ///
    /// - [`Error::Busy`] if the lock is not handed over within the timeout
    /// - [`Error::Internal`] if the calling thread already holds `key`
    pub fn acquire(&self, key: &str) -> Result<KeyGuard> {
        let lock = self.lock_for(key);
        let me = thread::current().id();
        let started = Instant::now();
        let deadline = started + self.timeout;

        let mut state = lock.state.lock();

        if state.holder == Some(me) {
            return Err(Error::Internal(format!(
                "re-entrant lock on '{}' from the thread that holds it",
                key
            )));
        }

        if state.holder.is_none() && state.queue.is_empty() {
            state.holder = Some(me);
            drop(state);
            return Ok(KeyGuard::new(key, lock));
        }

        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.queue.push_back(ticket);
        debug!(key, ticket, waiting = state.queue.len(), "waiting for document lock");

        loop {
            let timed_out = lock.released.wait_until(&mut state, deadline).timed_out();

            if state.holder.is_none() && state.queue.front() == Some(&ticket) {
                state.queue.pop_front();
                state.holder = Some(me);
                drop(state);
                return Ok(KeyGuard::new(key, lock));
            }

            if timed_out || Instant::now() >= deadline {
                state.queue.retain(|t| *t != ticket);
                drop(state);
                // We may have been at the front; let the next waiter re-check.
                lock.released.notify_all();

                let waited_ms = started.elapsed().as_millis() as u64;
                warn!(key, waited_ms, "document lock wait timed out");
                return Err(Error::Busy {
                    key: key.to_string(),
                    waited_ms,
                });
            }
        }
    }

    /// Acquire several keys in global (sorted) order
    ///
    /// Duplicate keys are acquired once. On failure, locks already taken are
    /// released before returning.
    pub fn acquire_many(&self, keys: &[&str]) -> Result<Vec<KeyGuard>> {
        let mut ordered: Vec<&str> = keys.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for key in ordered {
            guards.push(self.acquire(key)?);
        }
        Ok(guards)
    }
}

impl Default for LockTable {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl std::fmt::Debug for LockTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockTable")
            .field("keys", &self.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Exclusive hold on one document key
///
/// Released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct KeyGuard {
    key: String,
    lock: Arc<KeyLock>,
}

impl KeyGuard {
    fn new(key: &str, lock: Arc<KeyLock>) -> Self {
        Self {
            key: key.to_string(),
            lock,
        }
    }

    /// Key this guard holds
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        let mut state = self.lock.state.lock();
        state.holder = None;
        drop(state);
        self.lock.released.notify_all();
    }
}

impl std::fmt::Debug for KeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGuard").field("key", &self.key).finish()
    }
}
