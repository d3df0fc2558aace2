//! Fulfillment collaborator
//!
//! Disbursement credits balances in a system outside this core. It is not
//! idempotent and not transactional with our documents: a disbursement that
//! succeeded remotely but whose local claim failed to persist may be
//! delivered again on retry. Claims are only recorded after a successful
//! disbursement, so the local state is never "claimed but unpaid".

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amount to pay a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Coins to credit
    pub coins: u64,
    /// Why the payout happens (e.g. "level-5", "season 2026-S3 free tier 2")
    pub reason: String,
}

/// Fulfillment failure reported by the collaborator
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct FulfillmentError(pub String);

/// External balance-mutation endpoint
pub trait Fulfillment: Send + Sync {
    /// Credit `payout` to `user`.
    fn disburse(&self, user: &str, payout: &Payout) -> Result<(), FulfillmentError>;
}

/// Fulfillment that only logs payouts
///
/// Default when no collaborator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFulfillment;

impl Fulfillment for LoggingFulfillment {
    fn disburse(&self, user: &str, payout: &Payout) -> Result<(), FulfillmentError> {
        tracing::info!(user, coins = payout.coins, reason = %payout.reason, "payout");
        Ok(())
    }
}
