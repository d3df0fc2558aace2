//! Vault Integration Tests
//!
//! End-to-end behavior through the `Vault` facade: concurrency, claims,
//! trades, the fragment shop, on-disk recovery and the request boundary.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test vault
//!
//! # Durability only
//! cargo test --test vault durability::
//! ```

#[path = "../common/mod.rs"]
mod common;

mod boundary;
mod claims;
mod durability;
mod locking;
mod properties;
