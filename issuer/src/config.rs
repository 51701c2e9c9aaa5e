//! Issuer configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use lodge_types::{BatchMode, CoinAmount, HolderAddress, LodgeParams, TokenCount};

use crate::error::IssuerError;

/// Configuration for a Lodge issuer.
///
/// Can be loaded from a TOML file via [`LodgeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LodgeConfig {
    /// Address of the founding owner.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Initial per-unit entry fee, in the smallest payment unit.
    #[serde(default)]
    pub entry_fee: u64,

    /// Standard units minted by the one-time initialization.
    #[serde(default = "default_standard_allocation")]
    pub founding_standard_allocation: u64,

    /// Genesis units minted by the one-time initialization.
    #[serde(default = "default_genesis_allocation")]
    pub founding_genesis_allocation: u64,

    /// Whether the Standard acquisition path validates payment.
    #[serde(default = "default_true")]
    pub require_payment_standard: bool,

    /// Whether the Genesis acquisition path validates payment.
    #[serde(default)]
    pub require_payment_genesis: bool,

    /// Atomicity policy for airdrop batches.
    #[serde(default = "default_batch_mode")]
    pub batch_mode: BatchMode,

    /// Where snapshots are written.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_owner() -> String {
    "ldg_founder".to_string()
}

fn default_standard_allocation() -> u64 {
    1000
}

fn default_genesis_allocation() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

fn default_batch_mode() -> BatchMode {
    BatchMode::BestEffort
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("./lodge_data/snapshot.bin")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LodgeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, IssuerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| IssuerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, IssuerError> {
        toml::from_str(s).map_err(|e| IssuerError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("LodgeConfig is always serializable to TOML")
    }

    /// The founding owner address, validated.
    pub fn owner_address(&self) -> Result<HolderAddress, IssuerError> {
        HolderAddress::parse(self.owner.clone()).map_err(|e| IssuerError::Config(e.to_string()))
    }

    /// Protocol parameters derived from this configuration.
    pub fn params(&self) -> LodgeParams {
        LodgeParams {
            entry_fee: CoinAmount::new(self.entry_fee.into()),
            founding_standard_allocation: TokenCount::new(self.founding_standard_allocation.into()),
            founding_genesis_allocation: TokenCount::new(self.founding_genesis_allocation.into()),
            require_payment_standard: self.require_payment_standard,
            require_payment_genesis: self.require_payment_genesis,
            batch_mode: self.batch_mode,
        }
    }
}

impl Default for LodgeConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            entry_fee: 0,
            founding_standard_allocation: default_standard_allocation(),
            founding_genesis_allocation: default_genesis_allocation(),
            require_payment_standard: true,
            require_payment_genesis: false,
            batch_mode: default_batch_mode(),
            snapshot_path: default_snapshot_path(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
