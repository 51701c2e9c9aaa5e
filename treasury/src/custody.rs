//! Treasury custody — deposits in, owner-initiated payouts out.

use lodge_types::{CoinAmount, HolderAddress};
use serde::{Deserialize, Serialize};

use crate::error::TreasuryError;

/// The seam to whatever actually carries value to a recipient.
///
/// Implementations may reject a delivery; the treasury treats a rejection
/// as `TransferFailed` and restores its balance.
pub trait PayoutOutlet {
    fn deliver(&mut self, to: &HolderAddress, amount: CoinAmount) -> Result<(), String>;
}

/// Funds held by the system itself.
///
/// Increased by deposits, decreased only by a full payout to the owner.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Treasury {
    balance: CoinAmount,
}

impl Treasury {
    pub fn new() -> Self {
        Self {
            balance: CoinAmount::ZERO,
        }
    }

    /// Restore a treasury from a persisted balance.
    pub fn with_balance(balance: CoinAmount) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> CoinAmount {
        self.balance
    }

    /// Accept a deposit into held funds.
    pub fn deposit(&mut self, amount: CoinAmount) -> Result<(), TreasuryError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;
        tracing::debug!(%amount, balance = %self.balance, "treasury deposit");
        Ok(())
    }

    /// Pay the entire held balance to `recipient` through `outlet`.
    ///
    /// The balance is zeroed before the outbound call (effects before
    /// interactions); if the outlet rejects the delivery the balance is
    /// restored and `TransferFailed` is returned, so a failed payout never
    /// loses funds. Returns the amount delivered.
    pub fn withdraw_all(
        &mut self,
        recipient: &HolderAddress,
        outlet: &mut dyn PayoutOutlet,
    ) -> Result<CoinAmount, TreasuryError> {
        let amount = self.balance;
        if amount.is_zero() {
            return Ok(CoinAmount::ZERO);
        }

        self.balance = CoinAmount::ZERO;
        match outlet.deliver(recipient, amount) {
            Ok(()) => {
                tracing::info!(to = %recipient, %amount, "treasury paid out");
                Ok(amount)
            }
            Err(reason) => {
                self.balance = amount;
                tracing::warn!(to = %recipient, %amount, %reason, "payout rejected");
                Err(TreasuryError::TransferFailed(reason))
            }
        }
    }
}

impl Default for Treasury {
    fn default() -> Self {
        Self::new()
    }
}
