//! The two membership classes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A membership class — one of exactly two fungible token categories.
///
/// The set is closed: no class is ever created or retired at runtime, and
/// every external class identifier must resolve through [`TokenClass::from_id`]
/// before any state is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Standard,
    Genesis,
}

impl TokenClass {
    /// Both classes, in wire-identifier order.
    pub const ALL: [TokenClass; 2] = [TokenClass::Standard, TokenClass::Genesis];

    /// Fixed wire identifier for this class.
    pub fn id(&self) -> u16 {
        match self {
            TokenClass::Standard => 1,
            TokenClass::Genesis => 2,
        }
    }

    /// Resolve a wire identifier to a class.
    ///
    /// Returns `None` for anything other than the two known identifiers —
    /// callers reject unknown classes before mutating state.
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            1 => Some(TokenClass::Standard),
            2 => Some(TokenClass::Genesis),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Standard => "standard",
            TokenClass::Genesis => "genesis",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
