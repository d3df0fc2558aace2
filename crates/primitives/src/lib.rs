//! Primitives for GameVault
//!
//! This crate implements the game-economy operations on top of the engine:
//! - progression: pure XP → level resolution
//! - RewardClaimGuard: at-most-once reward claims
//! - PlayerStatsStore: level, XP, wins, level rewards
//! - SeasonPass: season points, orbs, tier claims
//! - CardStore: card collections
//! - TradeCoordinator: atomic two-party card swaps
//! - FragmentShop: rotating card shop paid in fragments
//!
//! All primitives are stateless facades over `Arc<Database>`. Every mutation
//! goes through the transactional updater.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cards;
pub mod claim;
pub mod progression;
pub mod season;
pub mod shop;
pub mod stats;
pub mod trade;

#[cfg(test)]
mod testing;

pub use cards::CardStore;
pub use claim::{ClaimRequest, RewardClaimGuard};
pub use progression::{apply_xp, required_xp, XpOutcome};
pub use season::{SeasonPass, SeasonProgress};
pub use shop::FragmentShop;
pub use stats::PlayerStatsStore;
pub use trade::{TradeCoordinator, TradeIntent, TradeReceipt};
