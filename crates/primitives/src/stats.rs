//! PlayerStatsStore: per-player level, XP and win statistics
//!
//! ## Design: STATELESS FACADE
//!
//! PlayerStatsStore holds ONLY `Arc<Database>`. Every mutation is one
//! transactional update of `stats/{user}`.

use crate::claim::{ClaimRequest, RewardClaimGuard};
use crate::progression::{apply_xp, XpOutcome};
use chrono::{DateTime, Utc};
use gamevault_core::{keys, Error, LevelReward, Payout, PlayerStats, Result};
use gamevault_engine::Database;
use std::sync::Arc;
use tracing::info;

/// Player statistics primitive
#[derive(Clone)]
pub struct PlayerStatsStore {
    db: Arc<Database>,
}

impl PlayerStatsStore {
    /// Create new PlayerStatsStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the underlying database reference
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Stats of `user`, created with defaults on first access
    pub fn get(&self, user: &str) -> Result<PlayerStats> {
        keys::validate_user(user)?;
        self.db.store().load(&keys::stats(user), PlayerStats::default)
    }

    /// Add XP and resolve level-ups
    pub fn add_xp(&self, user: &str, delta: u64) -> Result<XpOutcome> {
        keys::validate_user(user)?;
        let outcome = self.db.updater().run_update(
            &keys::stats(user),
            PlayerStats::default,
            |stats: &mut PlayerStats| {
                let outcome = apply_xp(stats, delta);
                outcome.apply_to(stats);
                Ok(outcome)
            },
        )?;

        if outcome.leveled_up {
            info!(user, level = outcome.new_level, gained = outcome.levels_gained, "level up");
        }
        Ok(outcome)
    }

    /// Claim the reward for reaching `level`
    ///
    /// # Errors
    ///
    /// - `NotFound` if the level has no reward
    /// - `InsufficientResources` if the user has not reached `level`
    /// - `AlreadyClaimed` on a repeat claim
    /// - `ExternalFulfillment` if the payout fails (claim not recorded)
    pub fn claim_level_reward(&self, user: &str, level: u32) -> Result<LevelReward> {
        keys::validate_user(user)?;
        let reward = self
            .db
            .catalog()
            .level_reward(level)
            .ok_or_else(|| Error::NotFound(format!("no reward for level {}", level)))?;

        let request = ClaimRequest {
            doc_key: keys::stats(user),
            user,
            reward_id: level,
            label: format!("level-{}", level),
        };
        let payout = Payout {
            coins: reward.coins,
            reason: request.label.clone(),
        };

        RewardClaimGuard::new(Arc::clone(&self.db)).claim(
            &request,
            PlayerStats::default,
            |stats: &PlayerStats| {
                if stats.level >= level {
                    Ok(())
                } else {
                    Err(Error::InsufficientResources(format!(
                        "level {} required, {} is level {}",
                        level, user, stats.level
                    )))
                }
            },
            |stats: &mut PlayerStats| &mut stats.claimed_rewards,
            |_| self.db.fulfillment().disburse(user, &payout).map(|()| reward.clone()),
        )
    }

    /// Record a win
    pub fn record_win(
        &self,
        user: &str,
        amount: u64,
        jackpot: bool,
        at: DateTime<Utc>,
    ) -> Result<PlayerStats> {
        keys::validate_user(user)?;
        self.db.updater().run_update(
            &keys::stats(user),
            PlayerStats::default,
            |stats: &mut PlayerStats| {
                stats.record_win(amount, jackpot, at);
                Ok(stats.clone())
            },
        )
    }

    /// Reset progression and win statistics, keeping claimed rewards
    pub fn reset(&self, user: &str) -> Result<PlayerStats> {
        keys::validate_user(user)?;
        self.db.updater().run_update(
            &keys::stats(user),
            PlayerStats::default,
            |stats: &mut PlayerStats| {
                stats.reset();
                Ok(stats.clone())
            },
        )
    }
}

impl std::fmt::Debug for PlayerStatsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerStatsStore").finish()
    }
}
