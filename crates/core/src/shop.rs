//! Fragment shop rotation document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card offered for fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Catalog card id
    pub card_id: String,
    /// Price in fragments
    pub price_fragments: u64,
}

/// The current time-boxed item set
///
/// Stored under `shop/rotation` and replaced wholesale on expiry. The default
/// value has no expiry and counts as expired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopRotation {
    /// Items on offer
    pub items: Vec<ShopItem>,
    /// When this rotation stops being active
    pub rotation_ends_at: Option<DateTime<Utc>>,
    /// When this rotation was generated
    pub generated_at: Option<DateTime<Utc>>,
}

impl ShopRotation {
    /// Whether a new rotation must be generated at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.rotation_ends_at {
            Some(ends_at) => now >= ends_at,
            None => true,
        }
    }

    /// Item offering `card_id`, if any
    pub fn item(&self, card_id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|i| i.card_id == card_id)
    }
}
