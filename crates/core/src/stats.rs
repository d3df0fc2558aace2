//! Player statistics document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-player level, XP and win statistics
///
/// Stored under `stats/{user}`. After any update resolves,
/// `xp < required_xp(level)`; `claimed_rewards` only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Current level, starts at 1
    pub level: u32,
    /// XP accumulated toward the next level
    pub xp: u64,
    /// Largest single win amount
    pub biggest_win: u64,
    /// Number of recorded wins
    pub win_count: u64,
    /// Sum of all win amounts
    pub total_wins: u64,
    /// Number of wins flagged as jackpots
    pub jackpot_count: u64,
    /// Level rewards already disbursed
    pub claimed_rewards: BTreeSet<u32>,
    /// Time of the most recent win
    pub last_win_date: Option<DateTime<Utc>>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        PlayerStats {
            level: 1,
            xp: 0,
            biggest_win: 0,
            win_count: 0,
            total_wins: 0,
            jackpot_count: 0,
            claimed_rewards: BTreeSet::new(),
            last_win_date: None,
        }
    }
}

impl PlayerStats {
    /// Record a win.
    pub fn record_win(&mut self, amount: u64, jackpot: bool, at: DateTime<Utc>) {
        self.biggest_win = self.biggest_win.max(amount);
        self.win_count += 1;
        self.total_wins = self.total_wins.saturating_add(amount);
        if jackpot {
            self.jackpot_count += 1;
        }
        self.last_win_date = Some(at);
    }

    /// Reset progression and win statistics.
    ///
    /// Claimed rewards survive the reset so that nothing becomes claimable twice.
    pub fn reset(&mut self) {
        let claimed = std::mem::take(&mut self.claimed_rewards);
        *self = PlayerStats {
            claimed_rewards: claimed,
            ..PlayerStats::default()
        };
    }
}
