//! Reward claims against the fulfillment collaborator

use crate::common::{self, SEASON};
use gamevault::prelude::*;

#[test]
fn failed_disbursement_leaves_level_reward_claimable() {
    let f = common::ephemeral();
    f.vault.players.add_xp("alice", 1000).unwrap();

    f.fulfillment.fail_next();
    let err = f.vault.players.claim_level_reward("alice", 2).unwrap_err();
    assert_eq!(err.reason_code(), "EXTERNAL_FULFILLMENT_FAILURE");
    assert!(f.vault.players.get("alice").unwrap().claimed_rewards.is_empty());
    assert!(f.fulfillment.payouts().is_empty());

    let reward = f.vault.players.claim_level_reward("alice", 2).unwrap();
    assert_eq!(reward.coins, 500);
    let payouts = f.fulfillment.payouts();
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].0, "alice");
    assert_eq!(payouts[0].1.coins, 500);
}

#[test]
fn level_reward_requires_the_level() {
    let f = common::ephemeral();
    f.vault.players.add_xp("alice", 999).unwrap();

    let err = f.vault.players.claim_level_reward("alice", 2).unwrap_err();
    assert_eq!(err.reason_code(), "INSUFFICIENT_RESOURCES");

    let err = f.vault.players.claim_level_reward("alice", 3).unwrap_err();
    assert!(err.is_not_found());
    assert!(f.fulfillment.payouts().is_empty());
}

#[test]
fn reset_keeps_claimed_level_rewards() {
    let f = common::ephemeral();
    f.vault.players.add_xp("alice", 1000).unwrap();
    f.vault.players.claim_level_reward("alice", 2).unwrap();

    f.vault.players.reset("alice").unwrap();
    let stats = f.vault.players.get("alice").unwrap();
    assert_eq!((stats.level, stats.xp), (1, 0));
    assert!(stats.claimed_rewards.contains(&2));

    f.vault.players.add_xp("alice", 1000).unwrap();
    let err = f.vault.players.claim_level_reward("alice", 2).unwrap_err();
    assert!(matches!(err, Error::AlreadyClaimed { .. }));
}

#[test]
fn season_tracks_are_claimed_independently() {
    let f = common::ephemeral();
    f.vault.season.add_points("alice", 120).unwrap();

    assert_eq!(
        f.vault.season.claim_tier("alice", SEASON, 1, Track::Free).unwrap(),
        TierReward::Coins(50)
    );
    assert_eq!(
        f.vault.season.claim_tier("alice", SEASON, 1, Track::Vip).unwrap(),
        TierReward::Orbs(3)
    );
    let err = f
        .vault
        .season
        .claim_tier("alice", SEASON, 2, Track::Free)
        .unwrap_err();
    assert_eq!(err.reason_code(), "INSUFFICIENT_RESOURCES");

    let progress = f.vault.season.progress("alice", SEASON).unwrap();
    assert_eq!(progress.points, 120);
    assert_eq!(progress.orbs, 3);
    assert_eq!(progress.claimed_tiers, vec![1]);
    assert_eq!(progress.vip_claimed_tiers, vec![1]);
    assert_eq!(f.fulfillment.payouts().len(), 1);
}

#[test]
fn claims_of_one_user_do_not_affect_another() {
    let f = common::ephemeral();
    f.vault.season.add_points("alice", 100).unwrap();
    f.vault.season.add_points("bob", 100).unwrap();

    f.vault.season.claim_tier("alice", SEASON, 1, Track::Free).unwrap();
    f.vault.season.claim_tier("bob", SEASON, 1, Track::Free).unwrap();

    let users: Vec<_> = f.fulfillment.payouts().into_iter().map(|(u, _)| u).collect();
    assert_eq!(users, vec!["alice".to_string(), "bob".to_string()]);
}

#[test]
fn wins_accumulate_with_jackpots() {
    let f = common::ephemeral();
    f.vault.record_win("alice", 300, false).unwrap();
    f.clock.advance(chrono::Duration::minutes(5));
    f.vault.record_win("alice", 5000, true).unwrap();

    let stats = f.vault.players.get("alice").unwrap();
    assert_eq!(stats.win_count, 2);
    assert_eq!(stats.total_wins, 5300);
    assert_eq!(stats.jackpot_count, 1);
    assert_eq!(stats.biggest_win, 5000);
    assert_eq!(
        stats.last_win_date,
        Some(common::start_time() + chrono::Duration::minutes(5))
    );
}
