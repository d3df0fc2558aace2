//! Test doubles shared by the unit tests

use gamevault_core::{Fulfillment, FulfillmentError, Payout};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Fulfillment that records payouts and can be told to fail once
#[derive(Debug, Default)]
pub(crate) struct RecordingFulfillment {
    payouts: Mutex<Vec<(String, Payout)>>,
    fail_next: AtomicBool,
}

impl RecordingFulfillment {
    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub(crate) fn payouts(&self) -> Vec<(String, Payout)> {
        self.payouts.lock().clone()
    }
}

impl Fulfillment for RecordingFulfillment {
    fn disburse(&self, user: &str, payout: &Payout) -> Result<(), FulfillmentError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FulfillmentError("wallet service unavailable".into()));
        }
        self.payouts.lock().push((user.to_string(), payout.clone()));
        Ok(())
    }
}
