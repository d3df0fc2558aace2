//! Error types and request-boundary encoding
//!
//! Every operation returns [`Result`]. At the request boundary a result is
//! turned into an HTTP-style status code and a JSON body with [`to_reply`]:
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | `Ok(value)` | 200 | `value` as JSON |
//! | `Err(e)` | `e.status().http_code()` | [`WireError`] |

use serde::Serialize;
use tracing::error;

pub use gamevault_core::error::{Error, Result, StatusCategory};
pub use gamevault_core::wire::WireError;

/// Encode an operation result as `(status code, JSON body)`
pub fn to_reply<T: Serialize>(result: &Result<T>) -> (u16, String) {
    match result {
        Ok(value) => match serde_json::to_string(value) {
            Ok(body) => (200, body),
            Err(e) => {
                let err = Error::Internal(format!("cannot encode reply: {}", e));
                error!(error = %err, "reply encoding failed");
                (err.status().http_code(), WireError::from(&err).to_json())
            }
        },
        Err(e) => {
            if !e.is_expected() && !e.is_retryable() {
                error!(code = e.reason_code(), error = %e, "operation failed");
            }
            (e.status().http_code(), WireError::from(e).to_json())
        }
    }
}
