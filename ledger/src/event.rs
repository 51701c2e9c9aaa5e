//! Events emitted by ledger and issuer operations for subscribers.

use lodge_types::{CoinAmount, HolderAddress, TokenClass, TokenCount};

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Units moved between two holders.
    Transfer {
        from: HolderAddress,
        to: HolderAddress,
        class: TokenClass,
        amount: TokenCount,
    },
    /// New units were created and credited to a holder.
    Mint {
        to: HolderAddress,
        class: TokenClass,
        amount: TokenCount,
    },
    /// Payment value was received into the treasury.
    Deposit {
        from: HolderAddress,
        amount: CoinAmount,
    },
    /// The full treasury was paid out to the owner.
    Payout {
        to: HolderAddress,
        amount: CoinAmount,
    },
    /// The entry fee was changed by the authority.
    EntryFeeChanged {
        old: CoinAmount,
        new: CoinAmount,
    },
    /// The authority identity was reassigned.
    OwnershipTransferred {
        from: HolderAddress,
        to: HolderAddress,
    },
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling operation processing.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
