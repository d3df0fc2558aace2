//! Vault configuration
//!
//! Every field has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! path = "/var/lib/gamevault"   # omit for an in-memory vault
//! lock_timeout_ms = 5000
//! sync_writes = true
//!
//! [shop]
//! rotation_hours = 24
//! items_per_rotation = 6
//!
//! [shop.prices]
//! common = 50
//! uncommon = 100
//! rare = 250
//! epic = 600
//! ```
//!
//! Builder methods on [`DatabaseBuilder`](crate::DatabaseBuilder) override
//! individual fields after loading.

use gamevault_core::{Error, Rarity, Result};
use gamevault_durability::SyncMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default bound on lock waits
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Data directory; `None` keeps every document in memory
    pub path: Option<PathBuf>,
    /// How long an operation waits for a document lock before `Busy`
    pub lock_timeout_ms: u64,
    /// fsync every document and journal write
    pub sync_writes: bool,
    /// Fragment shop settings
    pub shop: ShopConfig,
}

impl Default for VaultConfig {
    fn default() -> Self {
        VaultConfig {
            path: None,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            sync_writes: true,
            shop: ShopConfig::default(),
        }
    }
}

impl VaultConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: VaultConfig = toml::from_str(source)
            .map_err(|e| Error::Validation(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            Error::StorageIo(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject values that would make the vault unusable
    pub fn validate(&self) -> Result<()> {
        if self.lock_timeout_ms == 0 {
            return Err(Error::Validation("lock_timeout_ms must be > 0".into()));
        }
        self.shop.validate()
    }

    /// Lock wait bound
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Sync mode for the file backend
    pub fn sync_mode(&self) -> SyncMode {
        if self.sync_writes {
            SyncMode::Strict
        } else {
            SyncMode::Relaxed
        }
    }
}

/// Fragment shop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Lifetime of a rotation
    pub rotation_hours: u32,
    /// Cards offered per rotation (fewer if the catalog is small)
    pub items_per_rotation: usize,
    /// Fragment price per rarity
    pub prices: RarityPrices,
    /// Fixed seed for item selection; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            rotation_hours: 24,
            items_per_rotation: 6,
            prices: RarityPrices::default(),
            seed: None,
        }
    }
}

impl ShopConfig {
    fn validate(&self) -> Result<()> {
        if self.rotation_hours == 0 {
            return Err(Error::Validation("shop.rotation_hours must be > 0".into()));
        }
        if self.items_per_rotation == 0 {
            return Err(Error::Validation(
                "shop.items_per_rotation must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Rotation lifetime as a chrono duration
    pub fn rotation_length(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.rotation_hours))
    }
}

/// Fragment prices for every rarity the shop sells
///
/// The top rarity has no price and is never offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityPrices {
    /// Common
    pub common: u64,
    /// Uncommon
    pub uncommon: u64,
    /// Rare
    pub rare: u64,
    /// Epic
    pub epic: u64,
}

impl Default for RarityPrices {
    fn default() -> Self {
        RarityPrices {
            common: 50,
            uncommon: 100,
            rare: 250,
            epic: 600,
        }
    }
}

impl RarityPrices {
    /// Price of a rarity, `None` if the shop never sells it
    pub fn price(&self, rarity: Rarity) -> Option<u64> {
        match rarity {
            Rarity::Common => Some(self.common),
            Rarity::Uncommon => Some(self.uncommon),
            Rarity::Rare => Some(self.rare),
            Rarity::Epic => Some(self.epic),
            Rarity::Legendary => None,
        }
    }
}
