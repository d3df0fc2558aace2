//! Storage layer for GameVault
//!
//! This crate implements document persistence with:
//! - DocumentBackend: raw key → bytes storage trait
//! - ShardedBackend: DashMap-based in-memory backend
//! - LockTable: per-key FIFO locks with bounded waits
//! - DocumentStore: typed whole-document load/save, lazy defaults, batches

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod codec;
pub mod lock;
pub mod sharded;
pub mod store;

pub use backend::DocumentBackend;
pub use lock::{KeyGuard, LockTable, DEFAULT_LOCK_TIMEOUT};
pub use sharded::ShardedBackend;
pub use store::{DocumentStore, WriteBatch};
