//! Fundamental types for the Lodge membership protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! holder addresses, token classes, amounts, timestamps, and protocol parameters.

pub mod address;
pub mod amount;
pub mod class;
pub mod error;
pub mod params;
pub mod time;

pub use address::HolderAddress;
pub use amount::{CoinAmount, TokenCount};
pub use class::TokenClass;
pub use error::TypeError;
pub use params::{BatchMode, LodgeParams};
pub use time::Timestamp;
