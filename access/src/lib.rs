//! Single-owner authority gate.
//!
//! Every privileged operation checks the caller against the current owner
//! before mutating any state. The caller identity is always an explicit
//! parameter — there is no ambient caller.

pub mod error;

pub use error::AccessError;

use lodge_types::HolderAddress;
use serde::{Deserialize, Serialize};

/// The single privileged identity permitted to perform administrative
/// operations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Authority {
    owner: HolderAddress,
}

impl Authority {
    pub fn new(owner: HolderAddress) -> Self {
        Self { owner }
    }

    /// The current owner.
    pub fn owner(&self) -> &HolderAddress {
        &self.owner
    }

    /// Fail with `Unauthorized` unless `caller` is the current owner.
    pub fn require_owner(&self, caller: &HolderAddress) -> Result<(), AccessError> {
        if caller == &self.owner {
            Ok(())
        } else {
            Err(AccessError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }

    /// Reassign ownership. Single-step, and itself owner-gated.
    pub fn transfer_ownership(
        &mut self,
        caller: &HolderAddress,
        new_owner: HolderAddress,
    ) -> Result<(), AccessError> {
        self.require_owner(caller)?;
        tracing::info!(from = %self.owner, to = %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> HolderAddress {
        HolderAddress::new(format!("ldg_{s}"))
    }

    #[test]
    fn owner_passes_gate() {
        let authority = Authority::new(addr("owner"));
        assert!(authority.require_owner(&addr("owner")).is_ok());
    }

    #[test]
    fn non_owner_is_unauthorized() {
        let authority = Authority::new(addr("owner"));
        let result = authority.require_owner(&addr("mallory"));
        match result.unwrap_err() {
            AccessError::Unauthorized { caller } => assert_eq!(caller, addr("mallory")),
        }
    }

    #[test]
    fn ownership_transfer_is_owner_gated() {
        let mut authority = Authority::new(addr("owner"));

        let result = authority.transfer_ownership(&addr("mallory"), addr("mallory"));
        assert!(result.is_err());
        assert_eq!(authority.owner(), &addr("owner"));

        authority
            .transfer_ownership(&addr("owner"), addr("heir"))
            .unwrap();
        assert_eq!(authority.owner(), &addr("heir"));

        // The old owner no longer passes the gate.
        assert!(authority.require_owner(&addr("owner")).is_err());
    }
}
