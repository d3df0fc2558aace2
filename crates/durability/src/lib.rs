//! Durability layer for GameVault
//!
//! This crate implements the on-disk backend:
//! - FileBackend: one checksummed file per document, atomic temp+rename writes
//! - PendingBatch journal: commit record for multi-document writes
//! - Recovery pass: roll committed batches forward, drop damaged records
//! - SyncMode: Strict (fsync) or Relaxed

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encoding; // Checksummed framing
pub mod file;
pub mod journal;
pub mod mode;
pub mod recovery;

pub use file::FileBackend;
pub use journal::{JournalEntry, PendingBatch};
pub use mode::SyncMode;
pub use recovery::RecoveryReport;
