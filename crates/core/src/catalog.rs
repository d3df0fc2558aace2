//! Reference catalog (read-only, owned outside this core)
//!
//! Card definitions, level rewards and season tier tables are content. The
//! core only reads them through the [`Catalog`] trait. [`StaticCatalog`] is
//! the in-memory implementation used by embedders and tests.

use crate::season::Track;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Card rarity, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// Common
    Common,
    /// Uncommon
    Uncommon,
    /// Rare
    Rare,
    /// Epic
    Epic,
    /// Legendary, never sold in the fragment shop
    Legendary,
}

impl Rarity {
    /// Highest rarity tier
    pub const TOP: Rarity = Rarity::Legendary;
}

/// Static card definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDef {
    /// Unique card id
    pub id: String,
    /// Display name
    pub name: String,
    /// Series the card belongs to
    pub anime: String,
    /// Rarity tier
    pub rarity: Rarity,
}

/// Reward granted for reaching a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelReward {
    /// Level that unlocks the reward
    pub level: u32,
    /// Coins paid through the fulfillment service
    pub coins: u64,
}

/// What a season tier pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierReward {
    /// Coins paid through the fulfillment service
    Coins(u64),
    /// Orbs credited in the season-pass document
    Orbs(u64),
}

/// Season-pass progression checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTier {
    /// Tier id, unique within a season and track
    pub id: u32,
    /// Track the tier belongs to
    pub track: Track,
    /// Points needed to claim
    pub required_points: u64,
    /// Payout
    pub reward: TierReward,
}

/// Read-only view of reference content
pub trait Catalog: Send + Sync {
    /// Card definition by id
    fn card(&self, card_id: &str) -> Option<CardDef>;

    /// Every card definition
    fn cards(&self) -> Vec<CardDef>;

    /// Reward for reaching `level`, if the level has one
    fn level_reward(&self, level: u32) -> Option<LevelReward>;

    /// Tier definition in a season's table
    fn season_tier(&self, season: &str, track: Track, tier_id: u32) -> Option<SeasonTier>;
}

/// In-memory catalog
///
/// ```ignore
/// let catalog = StaticCatalog::builder()
///     .card("fr-001", "Frieren", "Frieren", Rarity::Rare)
///     .level_reward(5, 500)
///     .season_tier("2026-S3", Track::Free, 1, 100, TierReward::Coins(50))
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    cards: Vec<CardDef>,
    card_index: HashMap<String, usize>,
    level_rewards: HashMap<u32, LevelReward>,
    season_tiers: HashMap<(String, Track, u32), SeasonTier>,
}

impl StaticCatalog {
    /// Start building a catalog
    pub fn builder() -> StaticCatalogBuilder {
        StaticCatalogBuilder::default()
    }
}

impl Catalog for StaticCatalog {
    fn card(&self, card_id: &str) -> Option<CardDef> {
        self.card_index.get(card_id).map(|&i| self.cards[i].clone())
    }

    fn cards(&self) -> Vec<CardDef> {
        self.cards.clone()
    }

    fn level_reward(&self, level: u32) -> Option<LevelReward> {
        self.level_rewards.get(&level).cloned()
    }

    fn season_tier(&self, season: &str, track: Track, tier_id: u32) -> Option<SeasonTier> {
        self.season_tiers
            .get(&(season.to_string(), track, tier_id))
            .cloned()
    }
}

/// Builder for [`StaticCatalog`]
#[derive(Debug, Default)]
pub struct StaticCatalogBuilder {
    catalog: StaticCatalog,
}

impl StaticCatalogBuilder {
    /// Add a card definition. A repeated id replaces the earlier definition.
    pub fn card(mut self, id: &str, name: &str, anime: &str, rarity: Rarity) -> Self {
        let def = CardDef {
            id: id.to_string(),
            name: name.to_string(),
            anime: anime.to_string(),
            rarity,
        };
        match self.catalog.card_index.get(id) {
            Some(&i) => self.catalog.cards[i] = def,
            None => {
                self.catalog
                    .card_index
                    .insert(id.to_string(), self.catalog.cards.len());
                self.catalog.cards.push(def);
            }
        }
        self
    }

    /// Add a level reward
    pub fn level_reward(mut self, level: u32, coins: u64) -> Self {
        self.catalog
            .level_rewards
            .insert(level, LevelReward { level, coins });
        self
    }

    /// Add a season tier
    pub fn season_tier(
        mut self,
        season: &str,
        track: Track,
        id: u32,
        required_points: u64,
        reward: TierReward,
    ) -> Self {
        self.catalog.season_tiers.insert(
            (season.to_string(), track, id),
            SeasonTier {
                id,
                track,
                required_points,
                reward,
            },
        );
        self
    }

    /// Finish building
    pub fn build(self) -> StaticCatalog {
        self.catalog
    }
}
