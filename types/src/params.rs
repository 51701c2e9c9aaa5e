//! Protocol parameters — everything the authority can tune.

use crate::amount::{CoinAmount, TokenCount};
use serde::{Deserialize, Serialize};

/// Atomicity policy for batch distribution.
///
/// `BestEffort` commits each transfer as it goes and stops at the first
/// failure, leaving earlier transfers applied. `AllOrNothing` validates the
/// whole batch up front and applies nothing if any element would fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    BestEffort,
    AllOrNothing,
}

/// All protocol parameters for a Lodge instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LodgeParams {
    /// Price of one Standard membership unit, in the smallest payment unit.
    /// Zero until the authority legislates a fee; a zero fee makes every
    /// payment validation trivially pass.
    pub entry_fee: CoinAmount,

    /// Standard units minted to the authority by the one-time initialization.
    pub founding_standard_allocation: TokenCount,

    /// Genesis units minted to the authority by the one-time initialization.
    pub founding_genesis_allocation: TokenCount,

    /// Whether the Standard acquisition path validates payment.
    pub require_payment_standard: bool,

    /// Whether the Genesis acquisition path validates payment.
    ///
    /// Off by default: the source system never charged for Genesis
    /// acquisition. The flag makes that policy explicit and reversible.
    pub require_payment_genesis: bool,

    /// Atomicity policy for airdrop batches.
    pub batch_mode: BatchMode,
}

impl LodgeParams {
    /// Lodge defaults — the founding configuration.
    pub fn lodge_defaults() -> Self {
        Self {
            entry_fee: CoinAmount::ZERO,
            founding_standard_allocation: TokenCount::new(1000),
            founding_genesis_allocation: TokenCount::new(100),
            require_payment_standard: true,
            require_payment_genesis: false,
            batch_mode: BatchMode::BestEffort,
        }
    }
}

/// Default is the founding Lodge configuration.
impl Default for LodgeParams {
    fn default() -> Self {
        Self::lodge_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_founding_allocations() {
        let params = LodgeParams::default();
        assert_eq!(params.founding_standard_allocation, TokenCount::new(1000));
        assert_eq!(params.founding_genesis_allocation, TokenCount::new(100));
        assert!(params.entry_fee.is_zero());
    }

    #[test]
    fn default_policy_charges_standard_only() {
        let params = LodgeParams::default();
        assert!(params.require_payment_standard);
        assert!(!params.require_payment_genesis);
        assert_eq!(params.batch_mode, BatchMode::BestEffort);
    }
}
