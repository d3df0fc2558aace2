//! CardStore: per-user card collections

use gamevault_core::{keys, CardCollection, Error, Result};
use gamevault_engine::Database;
use std::sync::Arc;
use tracing::debug;

/// Card collection primitive
#[derive(Clone)]
pub struct CardStore {
    db: Arc<Database>,
}

impl CardStore {
    /// Create new CardStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Collection of `user`, created empty on first access
    pub fn get(&self, user: &str) -> Result<CardCollection> {
        keys::validate_user(user)?;
        self.db
            .store()
            .load(&keys::cards(user), CardCollection::default)
    }

    /// Add one copy of a catalog card; returns the new count of that card
    ///
    /// # Errors
    ///
    /// `NotFound` if the catalog has no such card.
    pub fn add_card(&self, user: &str, card_id: &str) -> Result<u32> {
        keys::validate_user(user)?;
        let def = self
            .db
            .catalog()
            .card(card_id)
            .ok_or_else(|| Error::NotFound(format!("card '{}'", card_id)))?;
        let now = self.db.now();

        let count = self.db.updater().run_update(
            &keys::cards(user),
            CardCollection::default,
            |collection: &mut CardCollection| Ok(collection.add_card(&def.anime, card_id, now)),
        )?;
        debug!(user, card_id, count, "card added");
        Ok(count)
    }

    /// Fragment balance of `user`
    pub fn fragments(&self, user: &str) -> Result<u64> {
        Ok(self.get(user)?.fragments)
    }
}

impl std::fmt::Debug for CardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardStore").finish()
    }
}
