//! # GameVault
//!
//! Persistence and consistency layer for a game economy.
//!
//! GameVault stores per-player level and win statistics, a shared season-pass
//! ledger, card collections with fragment balances, and a rotating fragment
//! shop. Every mutation is a serialized read-modify-write of one document (or
//! two, for trades), so concurrent requests never lose updates and rewards
//! are claimed at most once.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gamevault::prelude::*;
//!
//! let vault = Vault::open("./vault-data")?;
//!
//! let outcome = vault.players.add_xp("alice", 1500)?;
//! vault.players.claim_level_reward("alice", 2)?;
//! vault.season.claim_tier("alice", "2026-S3", 1, Track::Free)?;
//! vault.trades.execute("alice", "fr-001", "bob", "op-004")?;
//! ```
//!
//! ## Primitives
//!
//! - [`PlayerStatsStore`] - level, XP, wins, level rewards
//! - [`SeasonPass`] - season points, orbs, tier claims
//! - [`CardStore`] - card collections
//! - [`TradeCoordinator`] - atomic card swaps
//! - [`FragmentShop`] - rotating shop paid in fragments
//!
//! ## Errors
//!
//! All operations return [`Result`]. [`to_reply`] turns a result into a
//! status code and JSON body for the request boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod database;
mod error;

pub mod prelude;

// Re-export main entry points
pub use database::{Vault, VaultBuilder};
pub use error::{to_reply, Error, Result, StatusCategory, WireError};

// Re-export primitives
pub use gamevault_primitives::{
    apply_xp, required_xp, CardStore, FragmentShop, PlayerStatsStore, SeasonPass,
    SeasonProgress, TradeCoordinator, TradeReceipt, XpOutcome,
};

// Re-export configuration and collaborator types
pub use gamevault_core::{
    CardCollection, CardDef, Catalog, Clock, Fulfillment, FulfillmentError, LevelReward,
    LoggingFulfillment, ManualClock, Payout, PlayerStats, Rarity, SeasonPassState, ShopItem,
    ShopRotation, StaticCatalog, SystemClock, TierReward, Track,
};
pub use gamevault_durability::{RecoveryReport, SyncMode};
pub use gamevault_engine::{DatabaseMetrics, RarityPrices, ShopConfig, VaultConfig};
