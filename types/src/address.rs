//! Holder address type with `ldg_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;

/// A Lodge holder address, always prefixed with `ldg_`.
///
/// An address is an opaque identity: the ledger attaches no meaning to it
/// beyond equality and hashing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolderAddress(String);

impl HolderAddress {
    /// The standard prefix for all Lodge holder addresses.
    pub const PREFIX: &'static str = "ldg_";

    /// Create a new holder address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `ldg_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with ldg_");
        Self(s)
    }

    /// Fallible variant of [`HolderAddress::new`] for untrusted input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        if s.starts_with(Self::PREFIX) && s.len() > Self::PREFIX.len() {
            Ok(Self(s))
        } else {
            Err(TypeError::InvalidAddress(s))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for HolderAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
