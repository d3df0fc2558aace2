//! RewardClaimGuard: at-most-once reward claims
//!
//! ## Claim Sequence
//!
//! Runs entirely inside one transactional update of the document holding the
//! claimed set:
//!
//! ```text
//! 1. load fresh state (under the document's lock)
//! 2. requirement(state)            → Err: nothing persisted
//! 3. reward in claimed set?        → AlreadyClaimed
//! 4. disburse(state)               → Err: ExternalFulfillment, nothing persisted
//! 5. insert reward into claimed set
//! 6. persist, release
//! ```
//!
//! The reward is marked claimed only after disbursement succeeds, so local
//! state is never "claimed but unpaid". The opposite window exists: if the
//! save in step 6 fails after a successful disbursement, a retry pays again.
//! The fulfillment collaborator must tolerate at-least-once delivery.

use gamevault_core::{Error, FulfillmentError, Result};
use gamevault_engine::Database;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Identifies one claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest<'a> {
    /// Document holding the claimed set
    pub doc_key: String,
    /// Claiming user
    pub user: &'a str,
    /// Reward id inside the claimed set (level, tier id)
    pub reward_id: u32,
    /// Human-readable reward label for errors and logs
    pub label: String,
}

/// Enforces at-most-once claims over a claimed set inside a document
#[derive(Clone)]
pub struct RewardClaimGuard {
    db: Arc<Database>,
}

impl RewardClaimGuard {
    /// Create a guard over `db`
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Claim a reward at most once
    ///
    /// - `requirement` checks eligibility against fresh state
    /// - `claimed_set` selects the set the reward id is recorded in
    /// - `disburse` pays out; it may also credit the document itself
    ///
    /// # Errors
    ///
    /// - whatever `requirement` returns
    /// - `AlreadyClaimed` if the reward id is already recorded
    /// - `ExternalFulfillment` if `disburse` fails
    /// - `Busy`/`StorageIo` from the transactional update
    pub fn claim<T, D, Q, S, P, R>(
        &self,
        request: &ClaimRequest<'_>,
        default: D,
        requirement: Q,
        claimed_set: S,
        disburse: P,
    ) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        D: FnOnce() -> T,
        Q: FnOnce(&T) -> Result<()>,
        S: Fn(&mut T) -> &mut BTreeSet<u32>,
        P: FnOnce(&mut T) -> std::result::Result<R, FulfillmentError>,
    {
        self.db
            .updater()
            .run_update(&request.doc_key, default, |state: &mut T| {
                requirement(&*state)?;

                if claimed_set(state).contains(&request.reward_id) {
                    return Err(Error::AlreadyClaimed {
                        user: request.user.to_string(),
                        reward: request.label.clone(),
                    });
                }

                let paid = disburse(state).map_err(|e| {
                    warn!(user = request.user, reward = %request.label, error = %e,
                        "disbursement failed, claim not recorded");
                    Error::ExternalFulfillment(e.0)
                })?;

                claimed_set(state).insert(request.reward_id);
                debug!(user = request.user, reward = %request.label, "reward claimed");
                Ok(paid)
            })
    }
}

impl std::fmt::Debug for RewardClaimGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardClaimGuard").finish()
    }
}
