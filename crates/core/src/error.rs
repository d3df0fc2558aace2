//! Error types for GameVault
//!
//! One taxonomy is shared by every layer. Each variant belongs to one of
//! three classes:
//!
//! | Class | Variants | Caller action |
//! |-------|----------|---------------|
//! | Expected | Validation, NotFound, AlreadyClaimed, InsufficientResources | Report, do not retry |
//! | Contention | Busy | Retry with backoff |
//! | Unexpected | ExternalFulfillment, StorageIo, Internal | Report; the mutation was discarded |
//!
//! One exception: a multi-document write whose journal record was written
//! but whose documents could not be applied returns `Internal`, and the
//! write is kept. The next successful recovery pass applies it, so the
//! caller must not repeat it.
//!
//! Every variant maps to a coarse [`StatusCategory`] and a stable reason code
//! (see [`Error::reason_code`]) for the request boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for GameVault operations
pub type Result<T> = std::result::Result<T, Error>;

/// All GameVault errors
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before touching any document
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced entity (card, tier, rotation item, reward) does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Reward key is already present in the claimed set
    #[error("already claimed: reward {reward} for {user}")]
    AlreadyClaimed {
        /// User who attempted the claim
        user: String,
        /// Reward key (level, tier id)
        reward: String,
    },

    /// Caller lacks the cards, points, level or fragments the operation needs
    #[error("insufficient resources: {0}")]
    InsufficientResources(String),

    /// Lock on a document was not acquired within the configured timeout
    #[error("busy: lock on '{key}' not acquired within {waited_ms}ms")]
    Busy {
        /// Document key that was contended
        key: String,
        /// How long the caller waited
        waited_ms: u64,
    },

    /// Fulfillment collaborator rejected or failed a disbursement
    #[error("external fulfillment failure: {0}")]
    ExternalFulfillment(String),

    /// Reading, writing or decoding a document failed
    #[error("storage I/O error: {0}")]
    StorageIo(String),

    /// Invariant violation or misuse (e.g. re-entrant update on a held key),
    /// or a committed batch still waiting to be applied
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller should retry the operation with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Busy { .. })
    }

    /// Whether this is an expected business outcome rather than a failure.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::NotFound(_)
                | Error::AlreadyClaimed { .. }
                | Error::InsufficientResources(_)
        )
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Coarse status category for the request boundary.
    pub fn status(&self) -> StatusCategory {
        match self {
            Error::Validation(_) => StatusCategory::BadRequest,
            Error::NotFound(_) => StatusCategory::NotFound,
            Error::AlreadyClaimed { .. } | Error::InsufficientResources(_) => {
                StatusCategory::Conflict
            }
            Error::Busy { .. } => StatusCategory::Unavailable,
            Error::ExternalFulfillment(_) => StatusCategory::BadGateway,
            Error::StorageIo(_) | Error::Internal(_) => StatusCategory::Internal,
        }
    }

    /// Stable machine-readable reason code.
    ///
    /// These codes are part of the boundary contract and must not change.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::AlreadyClaimed { .. } => "ALREADY_CLAIMED",
            Error::InsufficientResources(_) => "INSUFFICIENT_RESOURCES",
            Error::Busy { .. } => "BUSY",
            Error::ExternalFulfillment(_) => "EXTERNAL_FULFILLMENT_FAILURE",
            Error::StorageIo(_) => "STORAGE_IO_ERROR",
            Error::Internal(_) => "INTERNAL",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::StorageIo(e.to_string())
    }
}

/// Coarse status category returned at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCategory {
    /// Malformed or rejected input
    BadRequest,
    /// Referenced entity missing
    NotFound,
    /// Request conflicts with current state
    Conflict,
    /// Temporarily unavailable, retry later
    Unavailable,
    /// Upstream collaborator failed
    BadGateway,
    /// Server-side failure
    Internal,
}

impl StatusCategory {
    /// HTTP-equivalent status code for transports that want one.
    pub fn http_code(&self) -> u16 {
        match self {
            StatusCategory::BadRequest => 400,
            StatusCategory::NotFound => 404,
            StatusCategory::Conflict => 409,
            StatusCategory::Unavailable => 503,
            StatusCategory::BadGateway => 502,
            StatusCategory::Internal => 500,
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCategory::BadRequest => "bad_request",
            StatusCategory::NotFound => "not_found",
            StatusCategory::Conflict => "conflict",
            StatusCategory::Unavailable => "unavailable",
            StatusCategory::BadGateway => "bad_gateway",
            StatusCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}
