//! Shared fixtures for the integration suites

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use gamevault::prelude::*;
use gamevault::ManualClock;
use parking_lot::{Condvar, Mutex};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Duration;

pub const SEASON: &str = "2026-S3";

static TRACING: Once = Once::new();

/// Install a test-friendly fmt subscriber once per process
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Catalog used by every suite
///
/// - Series "Frieren": fr-001 (Rare), fr-002 (Common), fr-003 (Legendary)
/// - Series "One Piece": op-001 (Epic), op-002 (Uncommon), op-003 (Common)
/// - Level rewards at 2 and 5
/// - Season tiers: free 1 (100 pts, 50 coins), free 2 (500 pts, 200 coins), vip 1 (100 pts, 3 orbs)
pub fn catalog() -> StaticCatalog {
    StaticCatalog::builder()
        .card("fr-001", "Frieren", "Frieren", Rarity::Rare)
        .card("fr-002", "Fern", "Frieren", Rarity::Common)
        .card("fr-003", "Himmel", "Frieren", Rarity::Legendary)
        .card("op-001", "Luffy", "One Piece", Rarity::Epic)
        .card("op-002", "Zoro", "One Piece", Rarity::Uncommon)
        .card("op-003", "Nami", "One Piece", Rarity::Common)
        .level_reward(2, 500)
        .level_reward(5, 2_000)
        .season_tier(SEASON, Track::Free, 1, 100, TierReward::Coins(50))
        .season_tier(SEASON, Track::Free, 2, 500, TierReward::Coins(200))
        .season_tier(SEASON, Track::Vip, 1, 100, TierReward::Orbs(3))
        .build()
}

/// Fulfillment double: records payouts, can fail once, can block
#[derive(Default)]
pub struct TestFulfillment {
    payouts: Mutex<Vec<(String, Payout)>>,
    fail_next: AtomicBool,
    gate: Mutex<GateState>,
    gate_cv: Condvar,
}

#[derive(Default)]
struct GateState {
    closed: bool,
    waiting: bool,
}

impl TestFulfillment {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn payouts(&self) -> Vec<(String, Payout)> {
        self.payouts.lock().clone()
    }

    /// Make the next disbursements block until [`open_gate`](Self::open_gate)
    pub fn close_gate(&self) {
        self.gate.lock().closed = true;
    }

    /// Wait until a disbursement is blocked on the gate
    pub fn wait_until_blocked(&self) {
        let mut gate = self.gate.lock();
        while !gate.waiting {
            self.gate_cv.wait_for(&mut gate, Duration::from_millis(10));
        }
    }

    pub fn open_gate(&self) {
        let mut gate = self.gate.lock();
        gate.closed = false;
        self.gate_cv.notify_all();
    }
}

impl Fulfillment for TestFulfillment {
    fn disburse(&self, user: &str, payout: &Payout) -> std::result::Result<(), FulfillmentError> {
        {
            let mut gate = self.gate.lock();
            while gate.closed {
                gate.waiting = true;
                self.gate_cv.notify_all();
                self.gate_cv.wait(&mut gate);
            }
            gate.waiting = false;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FulfillmentError("wallet service unavailable".into()));
        }
        self.payouts.lock().push((user.to_string(), payout.clone()));
        Ok(())
    }
}

/// A vault with its test collaborators
pub struct Fixture {
    pub vault: Vault,
    pub fulfillment: Arc<TestFulfillment>,
    pub clock: Arc<ManualClock>,
}

pub fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
}

fn builder(fulfillment: &Arc<TestFulfillment>, clock: &Arc<ManualClock>) -> VaultBuilder {
    Vault::builder()
        .catalog(Arc::new(catalog()))
        .fulfillment(fulfillment.clone())
        .clock(clock.clone())
        .shop_seed(1234)
}

/// In-memory vault
pub fn ephemeral() -> Fixture {
    init_tracing();
    let fulfillment = Arc::new(TestFulfillment::default());
    let clock = Arc::new(ManualClock::new(start_time()));
    let vault = builder(&fulfillment, &clock).open().unwrap();
    Fixture {
        vault,
        fulfillment,
        clock,
    }
}

/// In-memory vault with a short lock timeout
pub fn ephemeral_with_timeout(timeout: Duration) -> Fixture {
    init_tracing();
    let fulfillment = Arc::new(TestFulfillment::default());
    let clock = Arc::new(ManualClock::new(start_time()));
    let vault = builder(&fulfillment, &clock)
        .lock_timeout(timeout)
        .open()
        .unwrap();
    Fixture {
        vault,
        fulfillment,
        clock,
    }
}

/// Durable vault at `path`
pub fn durable(path: &Path) -> Fixture {
    init_tracing();
    let fulfillment = Arc::new(TestFulfillment::default());
    let clock = Arc::new(ManualClock::new(start_time()));
    let vault = builder(&fulfillment, &clock)
        .path(path)
        .relaxed()
        .open()
        .unwrap();
    Fixture {
        vault,
        fulfillment,
        clock,
    }
}
