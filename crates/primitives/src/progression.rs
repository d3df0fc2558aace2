//! Level progression (pure)
//!
//! ```text
//! required_xp(level) = floor(1000 * level^1.5)
//!
//! xp += delta
//! WHILE xp >= required_xp(level):
//!     xp -= required_xp(level)
//!     level += 1
//! ```
//!
//! After [`apply_xp`] resolves, `xp < required_xp(level)` holds. Nothing here
//! touches storage; [`PlayerStatsStore`](crate::PlayerStatsStore) runs it
//! inside a transactional update.

use gamevault_core::PlayerStats;
use serde::{Deserialize, Serialize};

/// XP needed to advance from `level` to `level + 1`
pub fn required_xp(level: u32) -> u64 {
    let level = f64::from(level);
    (1000.0 * level * level.sqrt()).floor() as u64
}

/// Result of adding XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpOutcome {
    /// Level after the update
    pub new_level: u32,
    /// XP toward the next level after the update
    pub new_xp: u64,
    /// Whether at least one level was gained
    pub leveled_up: bool,
    /// Number of levels gained
    pub levels_gained: u32,
}

impl XpOutcome {
    /// Write the outcome into `stats`
    pub fn apply_to(&self, stats: &mut PlayerStats) {
        stats.level = self.new_level;
        stats.xp = self.new_xp;
    }
}

/// Compute the level and XP after adding `xp_delta` to `stats`
pub fn apply_xp(stats: &PlayerStats, xp_delta: u64) -> XpOutcome {
    let start_level = stats.level.max(1);
    let mut level = start_level;
    let mut xp = stats.xp.saturating_add(xp_delta);

    loop {
        let needed = required_xp(level);
        if xp < needed {
            break;
        }
        xp -= needed;
        level += 1;
    }

    XpOutcome {
        new_level: level,
        new_xp: xp,
        leveled_up: level > start_level,
        levels_gained: level - start_level,
    }
}
