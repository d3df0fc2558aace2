//! SeasonPass: season points, orbs and tier claims
//!
//! All users share the `season-pass` document. The season key is supplied by
//! the caller; working out which season is current is not this layer's job.
//!
//! Tier payouts come in two kinds:
//! - `Coins`: paid through the fulfillment collaborator
//! - `Orbs`: credited to the user's orb balance inside the same update that
//!   records the claim

use crate::claim::{ClaimRequest, RewardClaimGuard};
use gamevault_core::{keys, Error, Payout, Result, SeasonPassState, TierReward, Track};
use gamevault_engine::Database;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A user's standing in one season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonProgress {
    /// Season key
    pub season: String,
    /// Points held
    pub points: u64,
    /// Orb balance
    pub orbs: u64,
    /// Claimed free-track tiers, ascending
    pub claimed_tiers: Vec<u32>,
    /// Claimed VIP-track tiers, ascending
    pub vip_claimed_tiers: Vec<u32>,
}

/// Season-pass primitive
#[derive(Clone)]
pub struct SeasonPass {
    db: Arc<Database>,
}

impl SeasonPass {
    /// Create new SeasonPass instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn load(&self) -> Result<SeasonPassState> {
        self.db
            .store()
            .load(keys::SEASON_PASS, SeasonPassState::default)
    }

    /// Add season points; returns the new total
    pub fn add_points(&self, user: &str, delta: u64) -> Result<u64> {
        keys::validate_user(user)?;
        self.db.updater().run_update(
            keys::SEASON_PASS,
            SeasonPassState::default,
            |state: &mut SeasonPassState| Ok(state.add_points(user, delta)),
        )
    }

    /// Points held by `user`
    pub fn points(&self, user: &str) -> Result<u64> {
        keys::validate_user(user)?;
        Ok(self.load()?.points_of(user))
    }

    /// Orbs held by `user`
    pub fn orbs(&self, user: &str) -> Result<u64> {
        keys::validate_user(user)?;
        Ok(self.load()?.orbs_of(user))
    }

    /// Claim a tier on a track
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty season key
    /// - `NotFound` if the season has no such tier on that track
    /// - `InsufficientResources` if the user's points are below the tier's requirement
    /// - `AlreadyClaimed` on a repeat claim
    /// - `ExternalFulfillment` if a coin payout fails (claim not recorded)
    pub fn claim_tier(
        &self,
        user: &str,
        season: &str,
        tier_id: u32,
        track: Track,
    ) -> Result<TierReward> {
        keys::validate_user(user)?;
        if season.is_empty() {
            return Err(Error::Validation("season key must not be empty".into()));
        }
        let tier = self
            .db
            .catalog()
            .season_tier(season, track, tier_id)
            .ok_or_else(|| {
                Error::NotFound(format!("season {} has no {} tier {}", season, track, tier_id))
            })?;

        let request = ClaimRequest {
            doc_key: keys::SEASON_PASS.to_string(),
            user,
            reward_id: tier_id,
            label: format!("{}/{}/{}", season, track, tier_id),
        };

        RewardClaimGuard::new(Arc::clone(&self.db)).claim(
            &request,
            SeasonPassState::default,
            |state: &SeasonPassState| {
                let points = state.points_of(user);
                if points >= tier.required_points {
                    Ok(())
                } else {
                    Err(Error::InsufficientResources(format!(
                        "tier {} needs {} points, {} has {}",
                        tier_id, tier.required_points, user, points
                    )))
                }
            },
            |state: &mut SeasonPassState| state.claimed_set_mut(season, user, track),
            |state: &mut SeasonPassState| {
                match tier.reward {
                    TierReward::Coins(coins) => {
                        let payout = Payout {
                            coins,
                            reason: format!("season {}", request.label),
                        };
                        self.db.fulfillment().disburse(user, &payout)?;
                    }
                    TierReward::Orbs(orbs) => {
                        state.add_orbs(user, orbs);
                    }
                }
                Ok(tier.reward)
            },
        )
    }

    /// Points, orbs and claimed tiers of `user` in `season`
    pub fn progress(&self, user: &str, season: &str) -> Result<SeasonProgress> {
        keys::validate_user(user)?;
        let state = self.load()?;
        let claims = state.claims(season, user).cloned().unwrap_or_default();
        Ok(SeasonProgress {
            season: season.to_string(),
            points: state.points_of(user),
            orbs: state.orbs_of(user),
            claimed_tiers: claims.claimed_tiers.into_iter().collect(),
            vip_claimed_tiers: claims.vip_claimed_tiers.into_iter().collect(),
        })
    }
}

impl std::fmt::Debug for SeasonPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeasonPass").finish()
    }
}
