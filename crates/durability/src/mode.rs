//! Sync mode for file writes.

use serde::{Deserialize, Serialize};

/// When the file backend calls `fsync`
///
/// | Mode | Documents | Journal records | Data loss window on power failure |
/// |------|-----------|-----------------|-----------------------------------|
/// | Strict | fsync file + dir | fsync file + dir | None |
/// | Relaxed | rename only | rename only | OS page cache |
///
/// Both modes keep documents untorn: every write is temp-file + rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// fsync every write before it is acknowledged
    #[default]
    Strict,
    /// Leave flushing to the OS
    Relaxed,
}

impl SyncMode {
    /// Whether writes must be fsynced before returning
    pub fn requires_fsync(&self) -> bool {
        matches!(self, SyncMode::Strict)
    }
}
