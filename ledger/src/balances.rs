//! The balance table and its mutation primitives.

use std::collections::HashMap;

use lodge_types::{HolderAddress, TokenClass, TokenCount};

use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent};

/// Authoritative mapping of (holder, class) → quantity held.
///
/// All balance mutation in the system flows through `credit`, `debit` and
/// `transfer`. Emptied entries are removed so the table only carries live
/// balances.
pub struct BalanceLedger {
    balances: HashMap<(HolderAddress, TokenClass), TokenCount>,
    bus: EventBus,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            bus: EventBus::new(),
        }
    }

    /// Balance for a holder and class. Absent entries read as zero.
    pub fn balance(&self, holder: &HolderAddress, class: TokenClass) -> TokenCount {
        self.balances
            .get(&(holder.clone(), class))
            .copied()
            .unwrap_or(TokenCount::ZERO)
    }

    /// Increase a holder's balance. Zero amounts are a no-op.
    pub fn credit(
        &mut self,
        holder: &HolderAddress,
        class: TokenClass,
        amount: TokenCount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }

        let key = (holder.clone(), class);
        let current = self.balances.get(&key).copied().unwrap_or(TokenCount::ZERO);
        let updated = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.balances.insert(key, updated);

        tracing::debug!(holder = %holder, %class, %amount, "credit");
        Ok(())
    }

    /// Decrease a holder's balance. Zero amounts are a no-op.
    pub fn debit(
        &mut self,
        holder: &HolderAddress,
        class: TokenClass,
        amount: TokenCount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }

        let key = (holder.clone(), class);
        let current = self.balances.get(&key).copied().unwrap_or(TokenCount::ZERO);
        if current < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount.raw(),
                available: current.raw(),
            });
        }

        let updated = current - amount;
        if updated.is_zero() {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, updated);
        }

        tracing::debug!(holder = %holder, %class, %amount, "debit");
        Ok(())
    }

    /// Move units between two holders.
    ///
    /// Atomic: either both legs apply or neither does. A failed debit is
    /// never followed by a credit; a failed credit rolls the debit back.
    /// Emits [`LedgerEvent::Transfer`] on success.
    pub fn transfer(
        &mut self,
        from: &HolderAddress,
        to: &HolderAddress,
        class: TokenClass,
        amount: TokenCount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }

        self.debit(from, class, amount)?;
        if let Err(e) = self.credit(to, class, amount) {
            // Restore the debited balance; cannot fail because the entry was
            // reduced by this same amount a moment ago.
            let _ = self.credit(from, class, amount);
            return Err(e);
        }

        self.bus.emit(&LedgerEvent::Transfer {
            from: from.clone(),
            to: to.clone(),
            class,
            amount,
        });
        Ok(())
    }

    /// All holders of a class with a live balance.
    pub fn holders(&self, class: TokenClass) -> Vec<(HolderAddress, TokenCount)> {
        self.balances
            .iter()
            .filter(|((_, c), _)| *c == class)
            .map(|((holder, _), count)| (holder.clone(), *count))
            .collect()
    }

    /// Sum of all balances held for a class.
    pub fn total_held(&self, class: TokenClass) -> TokenCount {
        TokenCount::new(
            self.balances
                .iter()
                .filter(|((_, c), _)| *c == class)
                .map(|(_, count)| count.raw())
                .sum(),
        )
    }

    /// Number of live (holder, class) entries.
    pub fn entry_count(&self) -> usize {
        self.balances.len()
    }

    /// Iterate all live entries, for snapshotting.
    pub fn entries(&self) -> impl Iterator<Item = (&(HolderAddress, TokenClass), &TokenCount)> {
        self.balances.iter()
    }

    /// Subscribe to ledger events.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    /// Emit an event on the ledger's bus on behalf of an orchestrating
    /// component (mints, deposits, payouts).
    pub fn emit(&self, event: &LedgerEvent) {
        self.bus.emit(event);
    }
}

impl Default for BalanceLedger {
    fn default() -> Self {
        Self::new()
    }
}
