//! TradeCoordinator: atomic one-for-one card swaps
//!
//! ## Trade Sequence
//!
//! ```text
//! 1. validate: distinct users, both cards in the catalog
//! 2. lock cards/{a} and cards/{b} in key order (run_update_pair)
//! 3. verify A holds card_a and B holds card_b   → else InsufficientResources
//! 4. A: -card_a +card_b    B: -card_b +card_a
//! 5. persist both through one batch             (journaled on disk)
//! ```
//!
//! Both documents are persisted or neither is. `total_cards` is unchanged on
//! both sides; `unique_cards` moves when a count crosses zero.

use chrono::{DateTime, Utc};
use gamevault_core::{keys, CardCollection, CardDef, Error, Result};
use gamevault_engine::Database;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// A proposed swap; exists only while a trade executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent<'a> {
    /// First party
    pub user_a: &'a str,
    /// Card the first party gives
    pub card_a: &'a str,
    /// Second party
    pub user_b: &'a str,
    /// Card the second party gives
    pub card_b: &'a str,
}

impl TradeIntent<'_> {
    fn validate(&self) -> Result<()> {
        keys::validate_user(self.user_a)?;
        keys::validate_user(self.user_b)?;
        if self.user_a == self.user_b {
            return Err(Error::Validation(format!(
                "{} cannot trade with themselves",
                self.user_a
            )));
        }
        Ok(())
    }
}

/// Outcome of a completed trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    /// First party
    pub user_a: String,
    /// Card the first party gave
    pub card_a: String,
    /// Second party
    pub user_b: String,
    /// Card the second party gave
    pub card_b: String,
    /// Cards held by the first party afterwards
    pub total_cards_a: u64,
    /// Cards held by the second party afterwards
    pub total_cards_b: u64,
    /// Execution time
    pub executed_at: DateTime<Utc>,
}

/// Trade primitive
#[derive(Clone)]
pub struct TradeCoordinator {
    db: Arc<Database>,
}

impl TradeCoordinator {
    /// Create new TradeCoordinator instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn card(&self, card_id: &str) -> Result<CardDef> {
        self.db
            .catalog()
            .card(card_id)
            .ok_or_else(|| Error::NotFound(format!("card '{}'", card_id)))
    }

    /// Swap one `card_a` held by `user_a` for one `card_b` held by `user_b`
    pub fn execute(
        &self,
        user_a: &str,
        card_a: &str,
        user_b: &str,
        card_b: &str,
    ) -> Result<TradeReceipt> {
        self.execute_intent(&TradeIntent {
            user_a,
            card_a,
            user_b,
            card_b,
        })
    }

    /// Execute a trade intent
    ///
    /// # Errors
    ///
    /// - `Validation` for a self-trade or malformed user id
    /// - `NotFound` if either card is not in the catalog
    /// - `InsufficientResources` if either party lacks their card (nothing changes)
    /// - `Busy`/`StorageIo` from the transactional update (nothing changes)
    /// - `Internal` if the trade was committed on disk but not yet applied;
    ///   it completes on the next recovery pass and must not be resubmitted
    pub fn execute_intent(&self, intent: &TradeIntent<'_>) -> Result<TradeReceipt> {
        intent.validate()?;
        let def_a = self.card(intent.card_a)?;
        let def_b = self.card(intent.card_b)?;
        let now = self.db.now();

        let receipt = self.db.updater().run_update_pair(
            &keys::cards(intent.user_a),
            &keys::cards(intent.user_b),
            CardCollection::default,
            CardCollection::default,
            |a: &mut CardCollection, b: &mut CardCollection| {
                require_owned(a, intent.user_a, intent.card_a)?;
                require_owned(b, intent.user_b, intent.card_b)?;

                a.remove_card(intent.card_a)?;
                b.remove_card(intent.card_b)?;
                a.add_card(&def_b.anime, intent.card_b, now);
                b.add_card(&def_a.anime, intent.card_a, now);

                a.check_invariants()?;
                b.check_invariants()?;

                Ok(TradeReceipt {
                    user_a: intent.user_a.to_string(),
                    card_a: intent.card_a.to_string(),
                    user_b: intent.user_b.to_string(),
                    card_b: intent.card_b.to_string(),
                    total_cards_a: a.total_cards,
                    total_cards_b: b.total_cards,
                    executed_at: now,
                })
            },
        )?;

        info!(
            user_a = intent.user_a,
            card_a = intent.card_a,
            user_b = intent.user_b,
            card_b = intent.card_b,
            "trade executed"
        );
        Ok(receipt)
    }
}

fn require_owned(collection: &CardCollection, user: &str, card_id: &str) -> Result<()> {
    if collection.owns(card_id) {
        Ok(())
    } else {
        Err(Error::InsufficientResources(format!(
            "{} does not own card '{}'",
            user, card_id
        )))
    }
}

impl std::fmt::Debug for TradeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeCoordinator").finish()
    }
}
