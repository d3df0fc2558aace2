//! Convenient imports for GameVault.
//!
//! ```ignore
//! use gamevault::prelude::*;
//!
//! let vault = Vault::ephemeral()?;
//! vault.season.add_points("alice", 100)?;
//! ```

// Main entry point
pub use crate::database::{Vault, VaultBuilder};

// Error handling
pub use crate::error::{to_reply, Error, Result};

// Documents
pub use gamevault_core::{CardCollection, PlayerStats, SeasonPassState, ShopRotation};

// Catalog and collaborators
pub use gamevault_core::{
    Catalog, Clock, Fulfillment, FulfillmentError, Payout, Rarity, StaticCatalog, TierReward,
    Track,
};

// Configuration
pub use gamevault_engine::{ShopConfig, VaultConfig};

// Shared handles
pub use std::sync::Arc;
