//! Core types for GameVault
//!
//! This crate defines the types shared by every layer:
//! - [`Error`]: the error taxonomy and its boundary mapping
//! - Document types: [`PlayerStats`], [`SeasonPassState`], [`CardCollection`], [`ShopRotation`]
//! - External collaborators: [`Catalog`], [`Fulfillment`], [`Clock`]
//! - [`keys`]: document key layout

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cards;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod fulfillment;
pub mod keys;
pub mod season;
pub mod shop;
pub mod stats;
pub mod wire;

pub use cards::{AnimeCollection, CardCollection, OwnedCard};
pub use catalog::{
    CardDef, Catalog, LevelReward, Rarity, SeasonTier, StaticCatalog, StaticCatalogBuilder,
    TierReward,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result, StatusCategory};
pub use fulfillment::{Fulfillment, FulfillmentError, LoggingFulfillment, Payout};
pub use season::{SeasonClaims, SeasonPassState, Track};
pub use shop::{ShopItem, ShopRotation};
pub use stats::PlayerStats;
pub use wire::WireError;
