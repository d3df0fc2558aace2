//! FragmentShop: time-boxed card rotation bought with fragments
//!
//! ## Rotation Lifecycle
//!
//! ```text
//! Active ──(now >= rotation_ends_at)──► Expired ──(next read)──► Active(new)
//! ```
//!
//! Reads take a fast path while the stored rotation is active. An expired (or
//! missing) rotation is regenerated inside a transactional update that
//! re-checks expiry under the lock, so concurrent readers regenerate it once.
//!
//! Regeneration samples `items_per_rotation` cards from the catalog,
//! excluding the top rarity, priced from `ShopConfig::prices`.

use chrono::{DateTime, Utc};
use gamevault_core::{keys, CardCollection, Error, Rarity, Result, ShopItem, ShopRotation};
use gamevault_engine::Database;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fragment shop primitive
#[derive(Clone)]
pub struct FragmentShop {
    db: Arc<Database>,
}

impl FragmentShop {
    /// Create new FragmentShop instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Current rotation, regenerating it first if it has expired
    pub fn get_active_rotation(&self) -> Result<ShopRotation> {
        let now = self.db.now();
        if let Some(rotation) = self.db.store().get::<ShopRotation>(keys::SHOP_ROTATION)? {
            if !rotation.is_expired(now) {
                return Ok(rotation);
            }
        }

        self.db.updater().run_update(
            keys::SHOP_ROTATION,
            ShopRotation::default,
            |rotation: &mut ShopRotation| {
                let now = self.db.now();
                if rotation.is_expired(now) {
                    *rotation = self.generate(now);
                }
                Ok(rotation.clone())
            },
        )
    }

    fn generate(&self, now: DateTime<Utc>) -> ShopRotation {
        let config = self.db.shop_config();
        let candidates: Vec<ShopItem> = self
            .db
            .catalog()
            .cards()
            .into_iter()
            .filter(|card| card.rarity < Rarity::TOP)
            .filter_map(|card| {
                config.prices.price(card.rarity).map(|price| ShopItem {
                    card_id: card.id,
                    price_fragments: price,
                })
            })
            .collect();

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ now.timestamp_millis() as u64),
            None => StdRng::from_entropy(),
        };
        let items: Vec<ShopItem> = candidates
            .choose_multiple(&mut rng, config.items_per_rotation)
            .cloned()
            .collect();

        if items.is_empty() {
            warn!("catalog has no sellable cards, rotation is empty");
        }
        let ends_at = now + config.rotation_length();
        debug!(items = items.len(), ends_at = %ends_at, "shop rotation regenerated");

        ShopRotation {
            items,
            rotation_ends_at: Some(ends_at),
            generated_at: Some(now),
        }
    }

    /// Buy one copy of `card_id`; returns the fragment balance afterwards
    ///
    /// Duplicates of owned cards may be bought. Membership and price are
    /// checked against the rotation as it stands inside the update, so a
    /// rotation that expires mid-purchase does not sell at its old prices.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the card is not in the active rotation
    /// - `InsufficientResources` if the balance is below the price (balance unchanged)
    pub fn buy(&self, user: &str, card_id: &str) -> Result<u64> {
        keys::validate_user(user)?;
        // Regenerate first if the stored rotation has expired.
        self.get_active_rotation()?;
        let def = self
            .db
            .catalog()
            .card(card_id)
            .ok_or_else(|| Error::NotFound(format!("card '{}'", card_id)))?;

        let (balance, price) = self.db.updater().run_update(
            &keys::cards(user),
            CardCollection::default,
            |collection: &mut CardCollection| {
                let now = self.db.now();
                let rotation = self
                    .db
                    .store()
                    .get::<ShopRotation>(keys::SHOP_ROTATION)?
                    .filter(|rotation| !rotation.is_expired(now))
                    .ok_or_else(|| Error::NotFound("no active shop rotation".into()))?;
                let item = rotation.item(card_id).ok_or_else(|| {
                    Error::NotFound(format!("card '{}' is not in the active rotation", card_id))
                })?;

                let balance = collection.debit_fragments(item.price_fragments)?;
                collection.add_card(&def.anime, card_id, now);
                Ok((balance, item.price_fragments))
            },
        )?;
        debug!(user, card_id, price, balance, "shop purchase");
        Ok(balance)
    }

    /// Credit fragments to `user`; returns the new balance
    pub fn grant_fragments(&self, user: &str, amount: u64) -> Result<u64> {
        keys::validate_user(user)?;
        self.db.updater().run_update(
            &keys::cards(user),
            CardCollection::default,
            |collection: &mut CardCollection| Ok(collection.credit_fragments(amount)),
        )
    }
}

impl std::fmt::Debug for FragmentShop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentShop").finish()
    }
}
