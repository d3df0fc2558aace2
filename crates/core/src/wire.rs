//! Wire error representation for the request boundary
//!
//! All errors encode to JSON as:
//! ```json
//! {
//!   "status": "Conflict",
//!   "code": "ALREADY_CLAIMED",
//!   "message": "already claimed: reward 5 for alice"
//! }
//! ```

use crate::error::{Error, StatusCategory};
use serde::{Deserialize, Serialize};

/// Canonical wire form of an [`Error`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Coarse status category
    pub status: StatusCategory,
    /// Stable reason code (e.g. "NOT_FOUND")
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl WireError {
    /// Encode as a JSON string
    pub fn to_json(&self) -> String {
        // A struct of strings and a unit enum cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"{}","message":"{}"}}"#, self.code, self.code)
        })
    }
}

impl From<&Error> for WireError {
    fn from(e: &Error) -> Self {
        WireError {
            status: e.status(),
            code: e.reason_code().to_string(),
            message: e.to_string(),
        }
    }
}

impl From<Error> for WireError {
    fn from(e: Error) -> Self {
        WireError::from(&e)
    }
}
