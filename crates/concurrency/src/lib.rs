//! Concurrency layer for GameVault
//!
//! This crate implements the single mutation path for documents:
//! - TransactionalUpdater: per-key serialized read-modify-write
//! - Ordered two-key updates persisted through one batch
//! - Commit/abort counters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod updater;

pub use updater::{TransactionalUpdater, UpdateMetrics};
