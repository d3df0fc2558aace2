//! Lock contention and the `Busy` outcome

use crate::common;
use gamevault::prelude::*;
use std::thread;
use std::time::Duration;

#[test]
fn held_lock_times_out_as_busy() {
    let f = common::ephemeral_with_timeout(Duration::from_millis(100));
    f.vault.players.add_xp("alice", 1000).unwrap();

    // The claim holds stats/alice while the fulfillment call is blocked.
    f.fulfillment.close_gate();
    let claimer = {
        let players = f.vault.players.clone();
        thread::spawn(move || players.claim_level_reward("alice", 2))
    };
    f.fulfillment.wait_until_blocked();

    let err = f.vault.players.add_xp("alice", 10).unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err, Error::Busy { ref key, .. } if key == "stats/alice"));

    // Other users' documents are not affected.
    f.vault.players.add_xp("bob", 10).unwrap();

    f.fulfillment.open_gate();
    claimer.join().unwrap().unwrap();

    let outcome = f.vault.players.add_xp("alice", 10).unwrap();
    assert_eq!(outcome.new_xp, 10);
    assert!(f.vault.players.get("alice").unwrap().claimed_rewards.contains(&2));
}

#[test]
fn busy_trade_leaves_both_collections_unchanged() {
    let f = common::ephemeral_with_timeout(Duration::from_millis(100));
    f.vault.cards.add_card("alice", "fr-001").unwrap();
    f.vault.cards.add_card("bob", "op-001").unwrap();
    f.vault.season.add_points("carol", 100).unwrap();

    // Block a season claim so the shared season document stays locked,
    // then show that card documents remain available to trades.
    f.fulfillment.close_gate();
    let claimer = {
        let season = f.vault.season.clone();
        thread::spawn(move || season.claim_tier("carol", common::SEASON, 1, Track::Free))
    };
    f.fulfillment.wait_until_blocked();

    let err = f.vault.season.add_points("alice", 1).unwrap_err();
    assert!(err.is_retryable());
    f.vault.trades.execute("alice", "fr-001", "bob", "op-001").unwrap();

    f.fulfillment.open_gate();
    claimer.join().unwrap().unwrap();
    assert_eq!(f.vault.season.points("alice").unwrap(), 0);
    assert!(f.vault.cards.get("alice").unwrap().owns("op-001"));
}

#[test]
fn metrics_count_committed_and_aborted_updates() {
    let f = common::ephemeral();
    let before = f.vault.metrics();

    f.vault.players.add_xp("alice", 1).unwrap();
    let _ = f.vault.players.claim_level_reward("alice", 2).unwrap_err();

    let after = f.vault.metrics();
    assert_eq!(after.updates_committed, before.updates_committed + 1);
    assert_eq!(after.updates_aborted, before.updates_aborted + 1);
    assert_eq!(after.backend, "memory");
}
