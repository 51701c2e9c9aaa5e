//! Full-state snapshots — capture every piece of persisted state at a point
//! in time.
//!
//! A snapshot holds the balance table, both mint counters, the entry fee,
//! the owner identity, the treasury balance and the class metadata. The
//! snapshot hash is computed deterministically from the state so a restored
//! copy can verify integrity; creation time is excluded so identical state
//! always hashes identically.

use std::path::Path;

use serde::{Deserialize, Serialize};

use lodge_registry::ClassMetadata;
use lodge_types::{CoinAmount, HolderAddress, Timestamp, TokenClass, TokenCount};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One live balance captured in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub holder: HolderAddress,
    pub class: TokenClass,
    pub amount: TokenCount,
}

/// The entire persisted state of a Lodge instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LodgeSnapshot {
    /// Blake2b-256 of the canonical state encoding.
    pub hash: [u8; 32],
    /// Snapshot format version for compatibility.
    pub version: u32,
    /// Timestamp when the snapshot was created. Not part of the hash.
    pub created_at: Timestamp,
    pub owner: HolderAddress,
    pub entry_fee: CoinAmount,
    pub treasury_balance: CoinAmount,
    pub initialized: bool,
    pub minted_standard: TokenCount,
    pub minted_genesis: TokenCount,
    /// Live balance entries, sorted by holder then class.
    pub balances: Vec<BalanceEntry>,
    pub standard_metadata: ClassMetadata,
    pub genesis_metadata: ClassMetadata,
}

impl LodgeSnapshot {
    /// Fill in the integrity hash from the current field values.
    pub fn seal(mut self) -> Self {
        self.hash = self.compute_hash();
        self
    }

    /// Compute the Blake2b-256 hash of this snapshot deterministically.
    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.owner.as_str().as_bytes());
        hasher.update(self.entry_fee.raw().to_le_bytes());
        hasher.update(self.treasury_balance.raw().to_le_bytes());
        hasher.update([self.initialized as u8]);
        hasher.update(self.minted_standard.raw().to_le_bytes());
        hasher.update(self.minted_genesis.raw().to_le_bytes());
        for entry in &self.balances {
            hasher.update(entry.holder.as_str().as_bytes());
            hasher.update(entry.class.id().to_le_bytes());
            hasher.update(entry.amount.raw().to_le_bytes());
        }
        for metadata in [&self.standard_metadata, &self.genesis_metadata] {
            hasher.update(metadata.name.as_bytes());
            hasher.update(metadata.uri.as_bytes());
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the state it carries.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("snapshot serialization should not fail")
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        bincode::deserialize(bytes).map_err(|e| e.to_string())
    }

    /// Write the snapshot to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        std::fs::write(path, self.to_bytes()).map_err(|e| e.to_string())
    }

    /// Read a snapshot back from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
        Self::from_bytes(&bytes)
    }

    /// Number of live balance entries in this snapshot.
    pub fn entry_count(&self) -> usize {
        self.balances.len()
    }
}
