//! Entry-fee arithmetic and payment validation.

use lodge_types::{CoinAmount, TokenCount};

use crate::error::TreasuryError;

/// Payment required for `quantity` units at `entry_fee` per unit.
///
/// Checked multiplication: an extreme quantity must not wrap the required
/// payment down past the attached value.
pub fn required_payment(
    entry_fee: CoinAmount,
    quantity: TokenCount,
) -> Result<CoinAmount, TreasuryError> {
    entry_fee
        .checked_mul_count(quantity)
        .ok_or(TreasuryError::Overflow)
}

/// Fail with `InsufficientPayment` if the attached value does not cover
/// `entry_fee × quantity`.
pub fn validate_payment(
    attached: CoinAmount,
    entry_fee: CoinAmount,
    quantity: TokenCount,
) -> Result<(), TreasuryError> {
    let required = required_payment(entry_fee, quantity)?;
    if attached < required {
        return Err(TreasuryError::InsufficientPayment {
            required: required.raw(),
            attached: attached.raw(),
        });
    }
    Ok(())
}
