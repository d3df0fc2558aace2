//! Database: the shared handle every facade operates through
//!
//! A `Database` owns the document store, the transactional updater and the
//! external collaborators (catalog, fulfillment, clock). Facades hold an
//! `Arc<Database>` and nothing else.
//!
//! # Example
//!
//! ```ignore
//! use gamevault_engine::Database;
//!
//! // In-memory, for tests
//! let db = Database::ephemeral()?;
//!
//! // Durable, with a catalog
//! let db = Database::builder()
//!     .path("/var/lib/gamevault")
//!     .catalog(Arc::new(catalog))
//!     .open()?;
//! ```
//!
//! # Backends
//!
//! | Method | Disk Files | Recovery |
//! |--------|------------|----------|
//! | `Database::ephemeral()` | None | No |
//! | `Database::open(path)` | `<path>/docs`, `<path>/journal` | Yes, on open |

use crate::config::{ShopConfig, VaultConfig};
use chrono::{DateTime, Utc};
use gamevault_concurrency::TransactionalUpdater;
use gamevault_core::{
    Catalog, Clock, Fulfillment, LoggingFulfillment, Result, StaticCatalog, SystemClock,
};
use gamevault_durability::{FileBackend, RecoveryReport, SyncMode};
use gamevault_storage::{DocumentBackend, DocumentStore, ShardedBackend};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Shared database handle
pub struct Database {
    store: Arc<DocumentStore>,
    updater: TransactionalUpdater,
    catalog: Arc<dyn Catalog>,
    fulfillment: Arc<dyn Fulfillment>,
    clock: Arc<dyn Clock>,
    config: VaultConfig,
    /// Present when documents live on disk
    file: Option<Arc<FileBackend>>,
}

impl Database {
    /// Open a durable database at `path` with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// In-memory database with default settings
    pub fn ephemeral() -> Result<Self> {
        Self::builder().open()
    }

    /// Start configuring a database
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Document store
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Transactional updater; the only mutation path for documents
    pub fn updater(&self) -> &TransactionalUpdater {
        &self.updater
    }

    /// Reference catalog
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Fulfillment collaborator
    pub fn fulfillment(&self) -> &dyn Fulfillment {
        self.fulfillment.as_ref()
    }

    /// Current time from the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Active configuration
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Shop settings
    pub fn shop_config(&self) -> &ShopConfig {
        &self.config.shop
    }

    /// Whether documents are kept in memory only
    pub fn is_ephemeral(&self) -> bool {
        self.file.is_none()
    }

    /// Data directory of a durable database
    pub fn data_dir(&self) -> Option<&Path> {
        self.file.as_deref().map(FileBackend::root)
    }

    /// Report of the last recovery pass (durable databases only)
    pub fn recovery_report(&self) -> Option<RecoveryReport> {
        self.file.as_ref().map(|f| f.last_recovery())
    }

    /// Flush backend buffers to stable storage
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    /// Counters
    pub fn metrics(&self) -> DatabaseMetrics {
        let updates = self.updater.metrics();
        DatabaseMetrics {
            updates_committed: updates.committed,
            updates_aborted: updates.aborted,
            lock_entries: self.store.locks().len(),
            backend: self.store.backend().name(),
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.store.backend().name())
            .field("data_dir", &self.data_dir())
            .field("config", &self.config)
            .finish()
    }
}

/// Database counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMetrics {
    /// Updates whose result was persisted
    pub updates_committed: u64,
    /// Updates discarded
    pub updates_aborted: u64,
    /// Keys with a lock-table entry
    pub lock_entries: usize,
    /// Backend name ("memory" or "file")
    pub backend: &'static str,
}

/// Builder for [`Database`]
///
/// Starts from [`VaultConfig::default`] (in-memory); every method overrides
/// one setting.
pub struct DatabaseBuilder {
    config: VaultConfig,
    catalog: Option<Arc<dyn Catalog>>,
    fulfillment: Option<Arc<dyn Fulfillment>>,
    clock: Option<Arc<dyn Clock>>,
}

impl DatabaseBuilder {
    /// Builder with default settings
    pub fn new() -> Self {
        Self::from_config(VaultConfig::default())
    }

    /// Builder seeded from a loaded configuration
    pub fn from_config(config: VaultConfig) -> Self {
        Self {
            config,
            catalog: None,
            fulfillment: None,
            clock: None,
        }
    }

    /// Store documents under `path`
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep documents in memory only
    pub fn ephemeral(mut self) -> Self {
        self.config.path = None;
        self
    }

    /// Bound on lock waits
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.config.lock_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// fsync every write (default)
    pub fn strict(mut self) -> Self {
        self.config.sync_writes = true;
        self
    }

    /// Leave flushing to the OS
    pub fn relaxed(mut self) -> Self {
        self.config.sync_writes = false;
        self
    }

    /// Fragment shop settings
    pub fn shop(mut self, shop: ShopConfig) -> Self {
        self.config.shop = shop;
        self
    }

    /// Fix the shop's random seed
    pub fn shop_seed(mut self, seed: u64) -> Self {
        self.config.shop.seed = Some(seed);
        self
    }

    /// Reference catalog (default: empty)
    pub fn catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Fulfillment collaborator (default: log only)
    pub fn fulfillment(mut self, fulfillment: Arc<dyn Fulfillment>) -> Self {
        self.fulfillment = Some(fulfillment);
        self
    }

    /// Time source (default: system clock)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Open the database
    ///
    /// A durable database runs its recovery pass before this returns.
    pub fn open(self) -> Result<Database> {
        self.config.validate()?;

        let (backend, file) = match &self.config.path {
            Some(path) => {
                let file = Arc::new(FileBackend::open(path, self.config.sync_mode())?);
                log_opened(path, self.config.sync_mode(), &file.last_recovery());
                (file.clone() as Arc<dyn DocumentBackend>, Some(file))
            }
            None => (Arc::new(ShardedBackend::new()) as Arc<dyn DocumentBackend>, None),
        };

        let store = Arc::new(DocumentStore::new(backend, self.config.lock_timeout()));
        Ok(Database {
            updater: TransactionalUpdater::new(Arc::clone(&store)),
            store,
            catalog: self
                .catalog
                .unwrap_or_else(|| Arc::new(StaticCatalog::default())),
            fulfillment: self
                .fulfillment
                .unwrap_or_else(|| Arc::new(LoggingFulfillment)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            config: self.config,
            file,
        })
    }
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn log_opened(path: &Path, mode: SyncMode, report: &RecoveryReport) {
    info!(
        path = %path.display(),
        mode = ?mode,
        repaired = report.has_issues(),
        "Opened durable vault"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamevault_core::{keys, ManualClock, Rarity};

    #[test]
    fn test_ephemeral_database() {
        let db = Database::ephemeral().unwrap();
        assert!(db.is_ephemeral());
        assert!(db.data_dir().is_none());
        assert!(db.recovery_report().is_none());
        assert_eq!(db.metrics().backend, "memory");
    }

    #[test]
    fn test_durable_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = Database::open(dir.path()).unwrap();
            db.updater()
                .run_update(&keys::stats("alice"), || 0u64, |n| {
                    *n = 42;
                    Ok(())
                })
                .unwrap();
            assert_eq!(db.metrics().updates_committed, 1);
        }

        let db = Database::open(dir.path()).unwrap();
        assert_eq!(db.data_dir(), Some(dir.path()));
        assert!(!db.recovery_report().unwrap().has_issues());
        let value: Option<u64> = db.store().get(&keys::stats("alice")).unwrap();
        assert_eq!(value, Some(42));
    }

    #[test]
    fn test_builder_wires_collaborators() {
        let start = Utc::now();
        let clock = Arc::new(ManualClock::new(start));
        let catalog = StaticCatalog::builder()
            .card("c1", "One", "Series", Rarity::Common)
            .build();

        let db = Database::builder()
            .catalog(Arc::new(catalog))
            .clock(clock.clone())
            .lock_timeout(Duration::from_millis(50))
            .shop_seed(7)
            .open()
            .unwrap();

        assert!(db.catalog().card("c1").is_some());
        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(db.now(), start + chrono::Duration::minutes(5));
        assert_eq!(db.store().locks().timeout(), Duration::from_millis(50));
        assert_eq!(db.shop_config().seed, Some(7));
    }

    #[test]
    fn test_invalid_config_is_rejected_at_open() {
        let err = Database::builder()
            .lock_timeout(Duration::ZERO)
            .open()
            .unwrap_err();
        assert_eq!(err.reason_code(), "VALIDATION_ERROR");
    }
}
