//! Reentrancy lock for operations that perform outbound value transfers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::TreasuryError;

/// Explicit reentrancy lock.
///
/// Clones share the underlying flag, so a nested invocation reached through
/// an external callback observes the outer hold and is rejected. The guard
/// releases on drop, on every exit path including errors.
#[derive(Clone, Debug)]
pub struct ReentrancyLock {
    held: Arc<AtomicBool>,
}

impl ReentrancyLock {
    pub fn new() -> Self {
        Self {
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Acquire the lock for the duration of the returned guard.
    ///
    /// Fails with `ReentrancyBlocked` if the lock is already held.
    pub fn acquire(&self) -> Result<ReentrancyGuard, TreasuryError> {
        if self
            .held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return Err(TreasuryError::ReentrancyBlocked);
        }
        Ok(ReentrancyGuard {
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl Default for ReentrancyLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped hold on a [`ReentrancyLock`]; releases when dropped.
pub struct ReentrancyGuard {
    held: Arc<AtomicBool>,
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
