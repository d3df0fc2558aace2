//! Core consistency properties

use crate::common::{self, SEASON};
use gamevault::prelude::*;
use std::sync::Barrier;
use std::thread;

// =============================================================================
// No lost updates
// =============================================================================

#[test]
fn concurrent_xp_from_level_one_is_not_lost() {
    let f = common::ephemeral();
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = [1500u64, 2000]
        .into_iter()
        .map(|delta| {
            let players = f.vault.players.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                players.add_xp("alice", delta).unwrap()
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let stats = f.vault.players.get("alice").unwrap();
    assert_eq!(stats.level, 2);
    assert_eq!(stats.xp, 2500);
}

#[test]
fn concurrent_season_points_from_many_users_all_land() {
    let f = common::ephemeral();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let season = f.vault.season.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..25 {
                    season.add_points(&format!("user{}", i), 4).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for i in 0..8 {
        assert_eq!(f.vault.season.points(&format!("user{}", i)).unwrap(), 100);
    }
}

// =============================================================================
// Idempotent claims
// =============================================================================

#[test]
fn second_level_claim_is_already_claimed() {
    let f = common::ephemeral();
    f.vault.players.add_xp("alice", 1000).unwrap();

    f.vault.players.claim_level_reward("alice", 2).unwrap();
    let err = f.vault.players.claim_level_reward("alice", 2).unwrap_err();

    assert!(matches!(err, Error::AlreadyClaimed { .. }));
    let stats = f.vault.players.get("alice").unwrap();
    assert_eq!(stats.claimed_rewards.iter().filter(|&&l| l == 2).count(), 1);
    assert_eq!(f.fulfillment.payouts().len(), 1);
}

#[test]
fn racing_tier_claims_pay_exactly_once() {
    let f = common::ephemeral();
    f.vault.season.add_points("alice", 150).unwrap();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let season = f.vault.season.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                season.claim_tier("alice", SEASON, 1, Track::Free)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, Error::AlreadyClaimed { .. })));
    assert_eq!(f.fulfillment.payouts().len(), 1);
}

// =============================================================================
// Trades
// =============================================================================

#[test]
fn trade_moves_cards_and_tracks_uniqueness() {
    let f = common::ephemeral();
    let cards = &f.vault.cards;
    cards.add_card("alice", "fr-001").unwrap();
    cards.add_card("alice", "op-003").unwrap();
    cards.add_card("bob", "op-003").unwrap();
    cards.add_card("bob", "op-003").unwrap();

    // alice gives her only fr-001 and receives a second op-003.
    f.vault.trades.execute("alice", "fr-001", "bob", "op-003").unwrap();

    let alice = cards.get("alice").unwrap();
    assert_eq!(alice.total_cards, 2);
    assert_eq!(alice.unique_cards, 1);
    assert_eq!(alice.count_of("op-003"), 2);
    assert_eq!(alice.collections.len(), 1);

    let bob = cards.get("bob").unwrap();
    assert_eq!(bob.total_cards, 2);
    assert_eq!(bob.unique_cards, 2);
    assert_eq!(bob.count_of("fr-001"), 1);
    assert_eq!(bob.count_of("op-003"), 1);

    alice.check_invariants().unwrap();
    bob.check_invariants().unwrap();
}

#[test]
fn trade_with_missing_card_changes_nothing() {
    let f = common::ephemeral();
    let cards = &f.vault.cards;
    cards.add_card("alice", "fr-001").unwrap();
    cards.add_card("bob", "op-001").unwrap();
    let alice_before = cards.get("alice").unwrap();
    let bob_before = cards.get("bob").unwrap();

    let err = f
        .vault
        .trades
        .execute("alice", "fr-001", "bob", "op-002")
        .unwrap_err();

    assert_eq!(err.reason_code(), "INSUFFICIENT_RESOURCES");
    assert_eq!(cards.get("alice").unwrap(), alice_before);
    assert_eq!(cards.get("bob").unwrap(), bob_before);
}

// =============================================================================
// Fragment shop
// =============================================================================

#[test]
fn shop_rejects_unlisted_cards_and_short_balances() {
    let f = common::ephemeral();
    let rotation = f.vault.shop.get_active_rotation().unwrap();
    assert!(rotation.item("fr-003").is_none(), "top rarity is never sold");

    let err = f.vault.shop.buy("alice", "fr-003").unwrap_err();
    assert!(err.is_not_found());

    let item = &rotation.items[0];
    f.vault
        .shop
        .grant_fragments("alice", item.price_fragments - 1)
        .unwrap();
    let err = f.vault.shop.buy("alice", &item.card_id).unwrap_err();
    assert_eq!(err.reason_code(), "INSUFFICIENT_RESOURCES");
    assert_eq!(
        f.vault.cards.fragments("alice").unwrap(),
        item.price_fragments - 1
    );

    f.vault.shop.grant_fragments("alice", 1).unwrap();
    assert_eq!(f.vault.shop.buy("alice", &item.card_id).unwrap(), 0);
    assert_eq!(f.vault.cards.get("alice").unwrap().count_of(&item.card_id), 1);
}

#[test]
fn expired_rotation_regenerates_once_then_stays() {
    let f = common::ephemeral();
    let first = f.vault.shop.get_active_rotation().unwrap();
    assert_eq!(first.generated_at, Some(common::start_time()));

    f.clock.advance(chrono::Duration::hours(24));
    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shop = f.vault.shop.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                shop.get_active_rotation().unwrap()
            })
        })
        .collect();
    let seen: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let second = f.vault.shop.get_active_rotation().unwrap();
    assert_ne!(second.rotation_ends_at, first.rotation_ends_at);
    assert!(seen.iter().all(|r| *r == second));
    assert_eq!(f.vault.shop.get_active_rotation().unwrap(), second);
}
