//! File-per-document backend
//!
//! ## Layout
//!
//! ```text
//! <root>/
//!   docs/<base64url(key)>.doc          framed document (see encoding)
//!   journal/<millis>-<uuid>.pending    committed multi-document batches
//! ```
//!
//! ## Writes
//!
//! Every file is written to a temp file in the same directory, optionally
//! fsynced, and renamed over its target. Rename is atomic, so a reader sees
//! the old file or the new one, never a torn document.
//!
//! ## Batches
//!
//! `put_batch` writes a [`PendingBatch`] record first. That record is the
//! commit point. The documents are then applied and the record deleted. If
//! applying fails, the backend retries through the recovery pass; if that
//! fails too, the backend refuses further reads and writes until a recovery
//! pass succeeds, so no newer write can be overwritten by a later replay.
//!
//! | `put_batch` outcome | Batch |
//! |---------------------|-------|
//! | `Ok(())` | applied |
//! | `Err(StorageIo)` | discarded, the record was never written |
//! | `Err(Internal)` | committed, applied by the next successful recovery pass |

use crate::encoding::{decode_frame, encode_frame, DOC_MAGIC};
use crate::journal::PendingBatch;
use crate::mode::SyncMode;
use crate::recovery::{self, RecoveryReport};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use gamevault_core::{Error, Result};
use gamevault_storage::DocumentBackend;
use parking_lot::{Mutex, RwLock};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, warn};
use uuid::Uuid;

const DOC_EXT: &str = "doc";
pub(crate) const TMP_EXT: &str = "tmp";

/// Durable document backend
pub struct FileBackend {
    root: PathBuf,
    docs_dir: PathBuf,
    journal_dir: PathBuf,
    mode: SyncMode,
    /// Readers/writers share; the recovery pass takes it exclusively
    gate: RwLock<()>,
    needs_recovery: AtomicBool,
    last_recovery: Mutex<RecoveryReport>,
}

impl FileBackend {
    /// Open (or create) a backend rooted at `root` and run the recovery pass
    pub fn open(root: impl AsRef<Path>, mode: SyncMode) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let docs_dir = root.join("docs");
        let journal_dir = root.join("journal");
        fs::create_dir_all(&docs_dir)?;
        fs::create_dir_all(&journal_dir)?;

        let backend = FileBackend {
            root,
            docs_dir,
            journal_dir,
            mode,
            gate: RwLock::new(()),
            needs_recovery: AtomicBool::new(false),
            last_recovery: Mutex::new(RecoveryReport::default()),
        };
        backend.recover()?;
        Ok(backend)
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sync mode
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Report of the most recent recovery pass
    pub fn last_recovery(&self) -> RecoveryReport {
        self.last_recovery.lock().clone()
    }

    /// Run the recovery pass now
    pub fn recover(&self) -> Result<RecoveryReport> {
        let _exclusive = self.gate.write();
        self.recover_locked()
    }

    fn recover_locked(&self) -> Result<RecoveryReport> {
        let report = recovery::run(self)?;
        self.needs_recovery.store(false, Ordering::Release);
        *self.last_recovery.lock() = report.clone();
        Ok(report)
    }

    /// Finish any batch left half-applied before touching documents
    fn ensure_recovered(&self) -> Result<()> {
        if self.needs_recovery.load(Ordering::Acquire) {
            let _exclusive = self.gate.write();
            if self.needs_recovery.load(Ordering::Acquire) {
                self.recover_locked()?;
            }
        }
        Ok(())
    }

    pub(crate) fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    pub(crate) fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }

    fn doc_path(&self, key: &str) -> PathBuf {
        self.docs_dir
            .join(format!("{}.{}", URL_SAFE_NO_PAD.encode(key), DOC_EXT))
    }

    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension()? != DOC_EXT {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let raw = URL_SAFE_NO_PAD.decode(stem).ok()?;
        String::from_utf8(raw).ok()
    }

    // ========================================================================
    // Raw file operations (no gate)
    // ========================================================================

    pub(crate) fn write_doc(&self, key: &str, payload: &[u8]) -> Result<()> {
        let frame = encode_frame(DOC_MAGIC, payload);
        write_atomic(&self.docs_dir, &self.doc_path(key), &frame, self.mode)
    }

    fn read_doc(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let bytes = match fs::read(self.doc_path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let payload = decode_frame(DOC_MAGIC, &bytes)
            .map_err(|e| Error::StorageIo(format!("corrupt document '{}': {}", key, e)))?;
        Ok(Some(payload.to_vec()))
    }

    pub(crate) fn apply_batch(&self, batch: &PendingBatch) -> Result<()> {
        for entry in &batch.entries {
            self.write_doc(&entry.key, &entry.bytes)?;
        }
        Ok(())
    }
}

impl DocumentBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_recovered()?;
        let _shared = self.gate.read();
        self.read_doc(key)
    }

    fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.ensure_recovered()?;
        let _shared = self.gate.read();
        self.write_doc(key, &bytes)
    }

    fn put_batch(&self, entries: Vec<(String, Vec<u8>)>) -> Result<()> {
        self.ensure_recovered()?;

        let batch = PendingBatch::new(entries);
        let record = batch
            .encode()
            .map_err(|e| Error::StorageIo(format!("batch {}: {}", batch.id, e)))?;
        let record_path = self.journal_dir.join(batch.file_name());

        {
            let _shared = self.gate.read();

            // Commit point. Failing here leaves every document untouched.
            write_atomic(&self.journal_dir, &record_path, &record, self.mode)?;

            let applied = self
                .apply_batch(&batch)
                .and_then(|()| fs::remove_file(&record_path).map_err(Error::from));
            match applied {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(batch = %batch.id, keys = ?batch.keys(), error = %e,
                        "batch committed but not applied, running recovery");
                    self.needs_recovery.store(true, Ordering::Release);
                }
            }
        }

        // Past the commit point the batch is kept even if recovery fails now.
        self.ensure_recovered().map_err(|e| {
            error!(batch = %batch.id, error = %e,
                "recovery failed; documents stay blocked until a recovery pass succeeds");
            Error::Internal(format!(
                "batch {} committed but not applied ({}); the next recovery pass applies it",
                batch.id, e
            ))
        })
    }

    fn contains(&self, key: &str) -> Result<bool> {
        self.ensure_recovered()?;
        let _shared = self.gate.read();
        Ok(self.doc_path(key).exists())
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.ensure_recovered()?;
        let _shared = self.gate.read();
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.docs_dir)? {
            let path = entry?.path();
            if let Some(key) = Self::key_from_path(&path) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn flush(&self) -> Result<()> {
        let _shared = self.gate.read();
        sync_dir(&self.docs_dir)?;
        sync_dir(&self.journal_dir)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

impl std::fmt::Debug for FileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackend")
            .field("root", &self.root)
            .field("mode", &self.mode)
            .field("needs_recovery", &self.needs_recovery.load(Ordering::Relaxed))
            .finish()
    }
}

/// Write `contents` to `target` through a temp file in `dir` and a rename
pub(crate) fn write_atomic(dir: &Path, target: &Path, contents: &[u8], mode: SyncMode) -> Result<()> {
    let tmp = dir.join(format!("{}.{}", Uuid::new_v4(), TMP_EXT));

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(contents)?;
        if mode.requires_fsync() {
            file.sync_all()?;
        }
        drop(file);
        fs::rename(&tmp, target)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    if mode.requires_fsync() {
        sync_dir(dir)?;
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
