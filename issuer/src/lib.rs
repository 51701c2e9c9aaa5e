//! Membership issuance and the public operation surface.
//!
//! The [`MembershipIssuer`] owns every subsystem — authority, balance
//! ledger, treasury, metadata registry, reentrancy lock — and exposes the
//! full set of operations: owner-gated minting and distribution, the public
//! paid acquisition paths, treasury withdrawal, and snapshots of the whole
//! persisted state.

pub mod config;
pub mod error;
pub mod issuer;
pub mod snapshot;

pub use config::LodgeConfig;
pub use error::IssuerError;
pub use issuer::MembershipIssuer;
pub use snapshot::{BalanceEntry, LodgeSnapshot};
