//! Main entry point for GameVault.
//!
//! This module provides the `Vault` struct, the request-boundary facade: one
//! method per use case, grouped by primitive.

use crate::error::Result;
use chrono::{DateTime, Utc};
use gamevault_core::{Catalog, Clock, Fulfillment};
use gamevault_durability::RecoveryReport;
use gamevault_engine::{Database, DatabaseBuilder, DatabaseMetrics, ShopConfig, VaultConfig};
use gamevault_primitives::{CardStore, FragmentShop, PlayerStatsStore, SeasonPass, TradeCoordinator};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// The GameVault handle.
///
/// Create one with [`Vault::open`], [`Vault::ephemeral`] or [`Vault::builder`].
/// Cloning the primitives is cheap; they all share one database.
///
/// # Example
///
/// ```ignore
/// use gamevault::prelude::*;
///
/// let vault = Vault::builder()
///     .path("./vault-data")
///     .catalog(Arc::new(catalog))
///     .open()?;
///
/// vault.players.add_xp("alice", 1500)?;
/// vault.season.add_points("alice", 120)?;
/// vault.trades.execute("alice", "fr-001", "bob", "op-004")?;
/// let balance = vault.shop.buy("alice", "fr-002")?;
/// ```
pub struct Vault {
    /// The underlying engine database
    pub(crate) inner: Arc<Database>,

    /// Level, XP, wins and level rewards
    pub players: PlayerStatsStore,

    /// Season points, orbs and tier claims
    pub season: SeasonPass,

    /// Card collections
    pub cards: CardStore,

    /// Fragment shop
    pub shop: FragmentShop,

    /// Card trades
    pub trades: TradeCoordinator,
}

impl Vault {
    /// Open a durable vault at `path` with default settings.
    ///
    /// Runs the recovery pass before returning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Create an in-memory vault.
    ///
    /// No files are created and all data is lost when the vault is dropped.
    pub fn ephemeral() -> Result<Self> {
        Self::builder().open()
    }

    /// Open a vault from a loaded configuration.
    pub fn from_config(config: VaultConfig) -> Result<Self> {
        VaultBuilder::from_config(config).open()
    }

    /// Create a builder for vault configuration.
    pub fn builder() -> VaultBuilder {
        VaultBuilder::new()
    }

    /// Flush buffered writes to stable storage.
    pub fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    /// Data directory, `None` for an in-memory vault.
    pub fn path(&self) -> Option<&Path> {
        self.inner.data_dir()
    }

    /// Check if this vault keeps its documents in memory only.
    pub fn is_ephemeral(&self) -> bool {
        self.inner.is_ephemeral()
    }

    /// Report of the last recovery pass of a durable vault.
    pub fn recovery_report(&self) -> Option<RecoveryReport> {
        self.inner.recovery_report()
    }

    /// Current time from the configured clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.now()
    }

    /// Active configuration.
    pub fn config(&self) -> &VaultConfig {
        self.inner.config()
    }

    /// Get vault metrics.
    pub fn metrics(&self) -> DatabaseMetrics {
        self.inner.metrics()
    }

    /// Record a win at the current time.
    pub fn record_win(&self, user: &str, amount: u64, jackpot: bool) -> Result<()> {
        self.players
            .record_win(user, amount, jackpot, self.now())
            .map(|_| ())
    }

    fn from_engine(db: Arc<Database>) -> Self {
        Self {
            players: PlayerStatsStore::new(db.clone()),
            season: SeasonPass::new(db.clone()),
            cards: CardStore::new(db.clone()),
            shop: FragmentShop::new(db.clone()),
            trades: TradeCoordinator::new(db.clone()),
            inner: db,
        }
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").field("inner", &self.inner).finish()
    }
}

/// Builder for vault configuration.
///
/// ```ignore
/// // Production: durable, fsync on every write
/// let vault = Vault::builder().path("./vault-data").strict().open()?;
///
/// // Tests: in memory, manual clock, fixed shop seed
/// let vault = Vault::builder()
///     .clock(clock.clone())
///     .shop_seed(7)
///     .open()?;
/// ```
pub struct VaultBuilder {
    inner: DatabaseBuilder,
}

impl VaultBuilder {
    /// Create a new builder with default settings (in memory).
    pub fn new() -> Self {
        Self {
            inner: DatabaseBuilder::new(),
        }
    }

    /// Start from a loaded configuration.
    pub fn from_config(config: VaultConfig) -> Self {
        Self {
            inner: DatabaseBuilder::from_config(config),
        }
    }

    /// Set the data directory.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.inner = self.inner.path(path);
        self
    }

    /// Keep documents in memory only.
    pub fn ephemeral(mut self) -> Self {
        self.inner = self.inner.ephemeral();
        self
    }

    /// Bound on how long an operation waits for a document lock.
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.lock_timeout(timeout);
        self
    }

    /// fsync every write (default).
    pub fn strict(mut self) -> Self {
        self.inner = self.inner.strict();
        self
    }

    /// Leave flushing to the OS.
    pub fn relaxed(mut self) -> Self {
        self.inner = self.inner.relaxed();
        self
    }

    /// Fragment shop settings.
    pub fn shop(mut self, shop: ShopConfig) -> Self {
        self.inner = self.inner.shop(shop);
        self
    }

    /// Fix the shop's random seed.
    pub fn shop_seed(mut self, seed: u64) -> Self {
        self.inner = self.inner.shop_seed(seed);
        self
    }

    /// Reference catalog.
    pub fn catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.inner = self.inner.catalog(catalog);
        self
    }

    /// Fulfillment collaborator.
    pub fn fulfillment(mut self, fulfillment: Arc<dyn Fulfillment>) -> Self {
        self.inner = self.inner.fulfillment(fulfillment);
        self
    }

    /// Time source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.inner = self.inner.clock(clock);
        self
    }

    /// Open the vault.
    pub fn open(self) -> Result<Vault> {
        let db = Arc::new(self.inner.open()?);
        Ok(Vault::from_engine(db))
    }
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self::new()
    }
}
