//! Payment gateway: entry-fee validation, treasury custody, and the
//! reentrancy lock guarding outbound value transfers.
//!
//! The treasury never loses funds to a rejected payout: the balance is
//! zeroed before the outbound call and restored if the recipient rejects.

pub mod custody;
pub mod error;
pub mod fees;
pub mod guard;

pub use custody::{PayoutOutlet, Treasury};
pub use error::TreasuryError;
pub use fees::{required_payment, validate_payment};
pub use guard::{ReentrancyGuard, ReentrancyLock};
