//! Card collection document
//!
//! Stored under `cards/{user}`. Invariants, maintained by every mutator here:
//!
//! - `total_cards == Σ count`
//! - `unique_cards == number of card entries` (every entry has `count ≥ 1`)
//! - zero-count cards and empty anime groups are pruned, never persisted

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One owned card and how many copies are held
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedCard {
    /// Catalog card id
    pub card_id: String,
    /// Copies held, always ≥ 1 in a persisted document
    pub count: u32,
    /// When the first copy was obtained
    pub obtained_at: DateTime<Utc>,
}

/// Cards of one anime series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeCollection {
    /// Series name
    pub anime: String,
    /// Cards held from this series
    pub cards: Vec<OwnedCard>,
}

/// A user's card inventory and fragment balance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCollection {
    /// Cards grouped by series
    pub collections: Vec<AnimeCollection>,
    /// Sum of all card counts
    pub total_cards: u64,
    /// Number of distinct cards held
    pub unique_cards: u64,
    /// Fragment balance, spent in the fragment shop
    pub fragments: u64,
}

impl CardCollection {
    /// Copies of `card_id` held
    pub fn count_of(&self, card_id: &str) -> u32 {
        self.find(card_id)
            .map(|(g, c)| self.collections[g].cards[c].count)
            .unwrap_or(0)
    }

    /// Whether at least one copy of `card_id` is held
    pub fn owns(&self, card_id: &str) -> bool {
        self.count_of(card_id) > 0
    }

    fn find(&self, card_id: &str) -> Option<(usize, usize)> {
        self.collections.iter().enumerate().find_map(|(g, group)| {
            group
                .cards
                .iter()
                .position(|c| c.card_id == card_id)
                .map(|c| (g, c))
        })
    }

    /// Add one copy of a card, creating the series group and card entry if new.
    ///
    /// Returns the new count of that card.
    pub fn add_card(&mut self, anime: &str, card_id: &str, at: DateTime<Utc>) -> u32 {
        self.total_cards += 1;

        if let Some((g, c)) = self.find(card_id) {
            let card = &mut self.collections[g].cards[c];
            card.count += 1;
            return card.count;
        }

        self.unique_cards += 1;
        let owned = OwnedCard {
            card_id: card_id.to_string(),
            count: 1,
            obtained_at: at,
        };
        match self.collections.iter_mut().find(|g| g.anime == anime) {
            Some(group) => group.cards.push(owned),
            None => self.collections.push(AnimeCollection {
                anime: anime.to_string(),
                cards: vec![owned],
            }),
        }
        1
    }

    /// Remove one copy of a card, pruning the entry (and its group) at zero.
    ///
    /// Returns the remaining count. Fails with `InsufficientResources` if no
    /// copy is held; the collection is untouched in that case.
    pub fn remove_card(&mut self, card_id: &str) -> Result<u32> {
        let (g, c) = self
            .find(card_id)
            .ok_or_else(|| Error::InsufficientResources(format!("card '{}' not owned", card_id)))?;

        let group = &mut self.collections[g];
        group.cards[c].count -= 1;
        self.total_cards -= 1;

        let remaining = group.cards[c].count;
        if remaining == 0 {
            group.cards.remove(c);
            self.unique_cards -= 1;
            if group.cards.is_empty() {
                self.collections.remove(g);
            }
        }
        Ok(remaining)
    }

    /// Credit fragments and return the new balance.
    pub fn credit_fragments(&mut self, amount: u64) -> u64 {
        self.fragments = self.fragments.saturating_add(amount);
        self.fragments
    }

    /// Debit fragments and return the new balance.
    pub fn debit_fragments(&mut self, amount: u64) -> Result<u64> {
        if self.fragments < amount {
            return Err(Error::InsufficientResources(format!(
                "need {} fragments, have {}",
                amount, self.fragments
            )));
        }
        self.fragments -= amount;
        Ok(self.fragments)
    }

    /// Check the counter invariants against the card entries.
    pub fn check_invariants(&self) -> Result<()> {
        let sum: u64 = self
            .collections
            .iter()
            .flat_map(|g| g.cards.iter())
            .map(|c| c.count as u64)
            .sum();
        let entries = self.collections.iter().map(|g| g.cards.len() as u64).sum::<u64>();

        if sum != self.total_cards {
            return Err(Error::Internal(format!(
                "total_cards {} != sum of counts {}",
                self.total_cards, sum
            )));
        }
        if entries != self.unique_cards {
            return Err(Error::Internal(format!(
                "unique_cards {} != card entries {}",
                self.unique_cards, entries
            )));
        }
        let has_empty = self
            .collections
            .iter()
            .any(|g| g.cards.is_empty() || g.cards.iter().any(|c| c.count == 0));
        if has_empty {
            return Err(Error::Internal("zero-count entry persisted".into()));
        }
        Ok(())
    }
}
