//! Recovery pass for the file backend
//!
//! ## Recovery Sequence
//!
//! 1. Remove stray temp files (writes that never reached their rename)
//! 2. List pending-batch records, oldest first
//! 3. Roll each intact record forward: re-apply every document, delete record
//! 4. Discard damaged records: a record is renamed into place only after it is
//!    fully written, so a damaged one was never committed
//!
//! ## Key Principle
//!
//! After recovery every committed batch is fully applied and no batch is
//! partially visible.

use crate::file::{FileBackend, TMP_EXT};
use crate::journal::{PendingBatch, PENDING_EXT};
use gamevault_core::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of a recovery pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Committed batches re-applied
    pub batches_rolled_forward: u64,
    /// Damaged records dropped
    pub batches_discarded: u64,
    /// Documents rewritten while rolling forward
    pub documents_restored: u64,
    /// Leftover temp files removed
    pub temp_files_removed: u64,
    /// Time spent (microseconds)
    pub recovery_time_micros: u64,
}

impl RecoveryReport {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Recovery complete: {} batches rolled forward ({} documents), {} discarded, {} temp files removed, {:.2}ms",
            self.batches_rolled_forward,
            self.documents_restored,
            self.batches_discarded,
            self.temp_files_removed,
            self.recovery_time_micros as f64 / 1000.0
        )
    }

    /// Whether the pass found anything to repair
    pub fn has_issues(&self) -> bool {
        self.batches_rolled_forward > 0 || self.batches_discarded > 0 || self.temp_files_removed > 0
    }
}

fn files_with_ext(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |e| e == ext) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Run the recovery pass. Caller must hold the backend's gate exclusively.
pub(crate) fn run(backend: &FileBackend) -> Result<RecoveryReport> {
    let start = Instant::now();
    let mut report = RecoveryReport::default();

    for dir in [backend.docs_dir(), backend.journal_dir()] {
        for tmp in files_with_ext(dir, TMP_EXT)? {
            debug!("Removing stray temp file {}", tmp.display());
            fs::remove_file(&tmp)?;
            report.temp_files_removed += 1;
        }
    }

    for path in files_with_ext(backend.journal_dir(), PENDING_EXT)? {
        let bytes = fs::read(&path)?;
        match PendingBatch::decode(&bytes) {
            Ok(batch) => {
                backend.apply_batch(&batch)?;
                fs::remove_file(&path)?;
                report.batches_rolled_forward += 1;
                report.documents_restored += batch.entries.len() as u64;
                info!(batch = %batch.id, keys = ?batch.keys(), "Rolled forward pending batch");
            }
            Err(e) => {
                warn!("Discarding pending record {}: {}", path.display(), e);
                fs::remove_file(&path)?;
                report.batches_discarded += 1;
            }
        }
    }

    report.recovery_time_micros = start.elapsed().as_micros() as u64;
    if report.has_issues() {
        info!("{}", report.summary());
    } else {
        debug!("{}", report.summary());
    }
    Ok(report)
}
