//! Engine layer for GameVault
//!
//! This crate wires the lower layers into one shared handle:
//! - Database: document store, transactional updater, collaborators
//! - DatabaseBuilder: backend selection and overrides
//! - VaultConfig: TOML-loadable settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;

pub use config::{RarityPrices, ShopConfig, VaultConfig, DEFAULT_LOCK_TIMEOUT_MS};
pub use database::{Database, DatabaseBuilder, DatabaseMetrics};
