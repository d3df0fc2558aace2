//! Pending-batch journal records
//!
//! A multi-document write (a trade touches two collections) is first written
//! as one pending-batch record holding every resulting document. Once the
//! record is durable the batch is committed: the documents are then applied
//! one by one and the record removed. A crash anywhere after the record is
//! durable is finished by the recovery pass, which re-applies the record.
//!
//! Records carry the encoded documents, not the intent that produced them,
//! so re-applying one is idempotent.

use crate::encoding::{decode_frame, encode_frame, FrameError, JOURNAL_MAGIC};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// File extension of committed records
pub const PENDING_EXT: &str = "pending";

/// One document in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Document key
    pub key: String,
    /// Encoded document
    pub bytes: Vec<u8>,
}

/// A committed but possibly not yet applied batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBatch {
    /// Unique batch id
    pub id: Uuid,
    /// Creation time (millis since epoch), orders replay
    pub created_at_ms: i64,
    /// Documents to write
    pub entries: Vec<JournalEntry>,
}

/// Why a record could not be read
#[derive(Debug, Error)]
pub enum JournalError {
    /// Frame damaged
    #[error("damaged record: {0}")]
    Frame(#[from] FrameError),
    /// Payload does not decode
    #[error("undecodable record: {0}")]
    Decode(String),
    /// Batch does not encode
    #[error("unencodable record: {0}")]
    Encode(String),
}

impl PendingBatch {
    /// New batch stamped with the current time
    pub fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        PendingBatch {
            id: Uuid::new_v4(),
            created_at_ms: Utc::now().timestamp_millis(),
            entries: entries
                .into_iter()
                .map(|(key, bytes)| JournalEntry { key, bytes })
                .collect(),
        }
    }

    /// File name; lexical order equals creation order
    pub fn file_name(&self) -> String {
        format!("{:020}-{}.{}", self.created_at_ms.max(0), self.id, PENDING_EXT)
    }

    /// Keys this batch writes
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    /// Encode into a checksummed frame
    pub fn encode(&self) -> Result<Vec<u8>, JournalError> {
        let payload = rmp_serde::to_vec(self).map_err(|e| JournalError::Encode(e.to_string()))?;
        Ok(encode_frame(JOURNAL_MAGIC, &payload))
    }

    /// Decode and validate a record
    pub fn decode(bytes: &[u8]) -> Result<Self, JournalError> {
        let payload = decode_frame(JOURNAL_MAGIC, bytes)?;
        rmp_serde::from_slice(payload).map_err(|e| JournalError::Decode(e.to_string()))
    }
}
