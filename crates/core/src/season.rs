//! Season-pass ledger document
//!
//! A single shared document (`season-pass`) holds every user's points, orb
//! balance and per-season claimed tiers. Tier ids appear at most once in a
//! claimed set; claims are only added through the reward claim guard.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Reward track of a season tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Track {
    /// Track available to every player
    Free,
    /// Premium track
    Vip,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Free => f.write_str("free"),
            Track::Vip => f.write_str("vip"),
        }
    }
}

/// Tiers one user has claimed in one season
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonClaims {
    /// Claimed free-track tiers
    pub claimed_tiers: BTreeSet<u32>,
    /// Claimed VIP-track tiers
    pub vip_claimed_tiers: BTreeSet<u32>,
}

impl SeasonClaims {
    /// Claimed set for a track
    pub fn track(&self, track: Track) -> &BTreeSet<u32> {
        match track {
            Track::Free => &self.claimed_tiers,
            Track::Vip => &self.vip_claimed_tiers,
        }
    }

    /// Mutable claimed set for a track
    pub fn track_mut(&mut self, track: Track) -> &mut BTreeSet<u32> {
        match track {
            Track::Free => &mut self.claimed_tiers,
            Track::Vip => &mut self.vip_claimed_tiers,
        }
    }
}

/// Season-pass state for all users
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonPassState {
    /// Season points per user
    pub points: BTreeMap<String, u64>,
    /// season key → user → claims
    pub seasons: BTreeMap<String, BTreeMap<String, SeasonClaims>>,
    /// Orb balance per user
    pub orbs: BTreeMap<String, u64>,
}

impl SeasonPassState {
    /// Points held by a user (0 if unknown)
    pub fn points_of(&self, user: &str) -> u64 {
        self.points.get(user).copied().unwrap_or(0)
    }

    /// Orbs held by a user (0 if unknown)
    pub fn orbs_of(&self, user: &str) -> u64 {
        self.orbs.get(user).copied().unwrap_or(0)
    }

    /// Add points and return the new total.
    pub fn add_points(&mut self, user: &str, delta: u64) -> u64 {
        let entry = self.points.entry(user.to_string()).or_insert(0);
        *entry = entry.saturating_add(delta);
        *entry
    }

    /// Add orbs and return the new balance.
    pub fn add_orbs(&mut self, user: &str, delta: u64) -> u64 {
        let entry = self.orbs.entry(user.to_string()).or_insert(0);
        *entry = entry.saturating_add(delta);
        *entry
    }

    /// Claims of a user in a season, if any were recorded
    pub fn claims(&self, season: &str, user: &str) -> Option<&SeasonClaims> {
        self.seasons.get(season).and_then(|users| users.get(user))
    }

    /// Claimed set for `(season, user, track)`, created on demand
    pub fn claimed_set_mut(&mut self, season: &str, user: &str, track: Track) -> &mut BTreeSet<u32> {
        self.seasons
            .entry(season.to_string())
            .or_default()
            .entry(user.to_string())
            .or_default()
            .track_mut(track)
    }

    /// Whether a tier has been claimed
    pub fn is_claimed(&self, season: &str, user: &str, track: Track, tier: u32) -> bool {
        self.claims(season, user)
            .map(|c| c.track(track).contains(&tier))
            .unwrap_or(false)
    }
}
