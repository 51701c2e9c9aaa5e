//! The membership issuer — orchestrates every operation in the system.

use std::collections::HashMap;

use lodge_access::Authority;
use lodge_ledger::{BalanceLedger, LedgerEvent, LedgerError};
use lodge_registry::MetadataRegistry;
use lodge_treasury::{validate_payment, PayoutOutlet, ReentrancyLock, Treasury, TreasuryError};
use lodge_types::{BatchMode, CoinAmount, HolderAddress, LodgeParams, TokenClass, TokenCount};
use lodge_utils::{stats, StatsCounter};

use crate::error::IssuerError;
use crate::snapshot::{BalanceEntry, LodgeSnapshot, SNAPSHOT_VERSION};

/// Orchestrator for the membership ledger.
///
/// Owns the authority, balance ledger, treasury, metadata registry and the
/// reentrancy lock. Every operation takes the caller identity as an explicit
/// parameter; privileged operations check it against the authority before
/// touching any state.
///
/// Public acquisition draws from the owner's pre-minted pool — it never
/// mints new supply on demand.
pub struct MembershipIssuer {
    authority: Authority,
    ledger: BalanceLedger,
    treasury: Treasury,
    registry: MetadataRegistry,
    lock: ReentrancyLock,
    params: LodgeParams,
    entry_fee: CoinAmount,
    minted: HashMap<TokenClass, TokenCount>,
    initialized: bool,
    stats: StatsCounter,
}

impl MembershipIssuer {
    pub fn new(owner: HolderAddress, params: LodgeParams) -> Self {
        let mut minted = HashMap::new();
        for class in TokenClass::ALL {
            minted.insert(class, TokenCount::ZERO);
        }
        let entry_fee = params.entry_fee;
        Self {
            authority: Authority::new(owner),
            ledger: BalanceLedger::new(),
            treasury: Treasury::new(),
            registry: MetadataRegistry::new(),
            lock: ReentrancyLock::new(),
            params,
            entry_fee,
            minted,
            initialized: false,
            stats: StatsCounter::lodge(),
        }
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn owner(&self) -> &HolderAddress {
        self.authority.owner()
    }

    pub fn entry_fee(&self) -> CoinAmount {
        self.entry_fee
    }

    /// Units ever minted for a class. Never decreases.
    pub fn total_minted(&self, class: TokenClass) -> TokenCount {
        self.minted.get(&class).copied().unwrap_or(TokenCount::ZERO)
    }

    pub fn balance_of(&self, holder: &HolderAddress, class: TokenClass) -> TokenCount {
        self.ledger.balance(holder, class)
    }

    pub fn treasury_balance(&self) -> CoinAmount {
        self.treasury.balance()
    }

    pub fn uri(&self, class_id: u16) -> Result<&str, IssuerError> {
        let class = Self::resolve_class(class_id)?;
        Ok(self.registry.uri(class))
    }

    pub fn params(&self) -> &LodgeParams {
        &self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// Subscribe to ledger events (transfers, mints, deposits, payouts).
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.ledger.subscribe(listener);
    }

    /// A handle to the reentrancy lock, sharing the underlying flag.
    ///
    /// Outer systems that perform their own outbound transfers can hold the
    /// same lock the issuer's guarded operations use.
    pub fn reentrancy_lock(&self) -> ReentrancyLock {
        self.lock.clone()
    }

    // ── Privileged operations ──────────────────────────────────────────

    /// Mint `quantity` units of the class identified by `class_id` to `to`.
    ///
    /// Unknown class identifiers are rejected before any state mutation.
    pub fn issue(
        &mut self,
        caller: &HolderAddress,
        to: &HolderAddress,
        class_id: u16,
        quantity: TokenCount,
    ) -> Result<(), IssuerError> {
        self.authority.require_owner(caller)?;
        let class = Self::resolve_class(class_id)?;
        self.mint_to(to, class, quantity)?;
        self.stats.increment(stats::OPS_PROCESSED);
        Ok(())
    }

    /// One-time founding mint: the configured Standard and Genesis
    /// allocations go to the caller (the owner).
    pub fn initialize(&mut self, caller: &HolderAddress) -> Result<(), IssuerError> {
        self.authority.require_owner(caller)?;
        if self.initialized {
            return Err(IssuerError::AlreadyInitialized);
        }

        let standard = self.params.founding_standard_allocation;
        let genesis = self.params.founding_genesis_allocation;
        self.mint_to(caller, TokenClass::Standard, standard)?;
        self.mint_to(caller, TokenClass::Genesis, genesis)?;
        self.initialized = true;

        tracing::info!(owner = %caller, %standard, %genesis, "founding allocations minted");
        self.stats.increment(stats::OPS_PROCESSED);
        Ok(())
    }

    /// Mint Standard units into the owner's own pool.
    pub fn mint_standard_to_self(
        &mut self,
        caller: &HolderAddress,
        quantity: TokenCount,
    ) -> Result<(), IssuerError> {
        self.authority.require_owner(caller)?;
        self.mint_to(caller, TokenClass::Standard, quantity)?;
        self.stats.increment(stats::OPS_PROCESSED);
        Ok(())
    }

    /// Set the per-unit entry fee for public acquisition.
    pub fn set_entry_fee(
        &mut self,
        caller: &HolderAddress,
        fee: CoinAmount,
    ) -> Result<(), IssuerError> {
        self.authority.require_owner(caller)?;
        let old = self.entry_fee;
        self.entry_fee = fee;
        self.ledger
            .emit(&LedgerEvent::EntryFeeChanged { old, new: fee });
        tracing::info!(%old, new = %fee, "entry fee changed");
        self.stats.increment(stats::OPS_PROCESSED);
        Ok(())
    }

    /// Pay the full treasury balance out to the owner through `outlet`.
    ///
    /// Atomic with respect to outlet rejection: a rejected payout restores
    /// the treasury balance. Held under the reentrancy lock for its full
    /// duration, since the outlet is an external call.
    pub fn withdraw_treasury(
        &mut self,
        caller: &HolderAddress,
        outlet: &mut dyn PayoutOutlet,
    ) -> Result<CoinAmount, IssuerError> {
        self.authority.require_owner(caller)?;
        let _guard = self.lock.acquire()?;

        let recipient = self.authority.owner().clone();
        match self.treasury.withdraw_all(&recipient, outlet) {
            Ok(amount) => {
                self.ledger.emit(&LedgerEvent::Payout {
                    to: recipient,
                    amount,
                });
                self.stats.increment(stats::PAYOUTS_COMPLETED);
                self.stats.increment(stats::OPS_PROCESSED);
                Ok(amount)
            }
            Err(e) => {
                self.stats.increment(stats::PAYOUTS_REJECTED);
                Err(e.into())
            }
        }
    }

    /// Distribute units from the owner's pool to a list of recipients.
    ///
    /// The two slices must pair up. Under `BatchMode::BestEffort` each
    /// transfer commits as it goes and the first failure aborts the rest,
    /// leaving earlier transfers applied; under `BatchMode::AllOrNothing`
    /// the whole batch is validated first and nothing applies on failure.
    /// The failing index is reported either way.
    pub fn airdrop(
        &mut self,
        caller: &HolderAddress,
        recipients: &[HolderAddress],
        quantities: &[TokenCount],
        class_id: u16,
    ) -> Result<(), IssuerError> {
        self.authority.require_owner(caller)?;
        let class = Self::resolve_class(class_id)?;
        if recipients.len() != quantities.len() {
            return Err(IssuerError::LengthMismatch {
                recipients: recipients.len(),
                quantities: quantities.len(),
            });
        }

        let owner = self.authority.owner().clone();
        if self.params.batch_mode == BatchMode::AllOrNothing {
            self.validate_batch(&owner, recipients, quantities, class)?;
        }

        for (index, (to, quantity)) in recipients.iter().zip(quantities).enumerate() {
            self.ledger
                .transfer(&owner, to, class, *quantity)
                .map_err(|source| IssuerError::BatchFailed { index, source })?;
        }

        tracing::info!(count = recipients.len(), %class, "airdrop distributed");
        self.stats.increment(stats::OPS_PROCESSED);
        Ok(())
    }

    /// Change the resource locator for a class.
    pub fn set_uri(
        &mut self,
        caller: &HolderAddress,
        class_id: u16,
        uri: impl Into<String>,
    ) -> Result<(), IssuerError> {
        self.authority.require_owner(caller)?;
        let class = Self::resolve_class(class_id)?;
        self.registry.set_uri(class, uri);
        self.stats.increment(stats::OPS_PROCESSED);
        Ok(())
    }

    /// Reassign the authority. Single-step, owner-gated.
    pub fn transfer_ownership(
        &mut self,
        caller: &HolderAddress,
        new_owner: HolderAddress,
    ) -> Result<(), IssuerError> {
        let old = self.authority.owner().clone();
        self.authority.transfer_ownership(caller, new_owner.clone())?;
        self.ledger.emit(&LedgerEvent::OwnershipTransferred {
            from: old,
            to: new_owner,
        });
        self.stats.increment(stats::OPS_PROCESSED);
        Ok(())
    }

    // ── Public operations ──────────────────────────────────────────────

    /// Acquire Standard memberships by paying the entry fee.
    pub fn apply_for_membership(
        &mut self,
        caller: &HolderAddress,
        quantity: TokenCount,
        attached: CoinAmount,
    ) -> Result<(), IssuerError> {
        self.acquire(caller, TokenClass::Standard, quantity, attached)
    }

    /// Acquire Genesis memberships.
    ///
    /// Payment is validated only when `require_payment_genesis` is set —
    /// off by default, matching the founding policy.
    pub fn apply_for_genesis_membership(
        &mut self,
        caller: &HolderAddress,
        quantity: TokenCount,
        attached: CoinAmount,
    ) -> Result<(), IssuerError> {
        self.acquire(caller, TokenClass::Genesis, quantity, attached)
    }

    /// Bare value deposit carrying no operation: credited to the treasury.
    pub fn receive_deposit(
        &mut self,
        from: &HolderAddress,
        amount: CoinAmount,
    ) -> Result<(), IssuerError> {
        self.treasury.deposit(amount)?;
        self.ledger.emit(&LedgerEvent::Deposit {
            from: from.clone(),
            amount,
        });
        tracing::info!(%from, %amount, "bare deposit received");
        self.stats.increment(stats::DEPOSITS_RECEIVED);
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn resolve_class(id: u16) -> Result<TokenClass, IssuerError> {
        TokenClass::from_id(id).ok_or(IssuerError::UnknownClass { id })
    }

    fn require_payment(&self, class: TokenClass) -> bool {
        match class {
            TokenClass::Standard => self.params.require_payment_standard,
            TokenClass::Genesis => self.params.require_payment_genesis,
        }
    }

    /// Shared acquisition path: validate payment per class policy, transfer
    /// from the owner's pool, deposit the attached value.
    fn acquire(
        &mut self,
        caller: &HolderAddress,
        class: TokenClass,
        quantity: TokenCount,
        attached: CoinAmount,
    ) -> Result<(), IssuerError> {
        let _guard = self.lock.acquire()?;

        if self.require_payment(class) {
            validate_payment(attached, self.entry_fee, quantity)?;
        }

        // Deposit cannot fail after this check, so the transfer below is the
        // last fallible step and the operation commits or leaves no trace.
        if self.treasury.balance().checked_add(attached).is_none() {
            return Err(TreasuryError::Overflow.into());
        }

        let owner = self.authority.owner().clone();
        self.ledger.transfer(&owner, caller, class, quantity)?;
        self.treasury.deposit(attached)?;
        self.ledger.emit(&LedgerEvent::Deposit {
            from: caller.clone(),
            amount: attached,
        });

        tracing::info!(buyer = %caller, %class, %quantity, paid = %attached, "membership acquired");
        self.stats.increment(stats::MEMBERSHIPS_SOLD);
        self.stats.increment(stats::OPS_PROCESSED);
        Ok(())
    }

    /// Mint: increment the class counter, then credit the recipient.
    ///
    /// The new counter value is computed before the credit so a failed
    /// credit leaves the counter untouched.
    fn mint_to(
        &mut self,
        to: &HolderAddress,
        class: TokenClass,
        quantity: TokenCount,
    ) -> Result<(), IssuerError> {
        let counter = self.total_minted(class);
        let updated = counter
            .checked_add(quantity)
            .ok_or(LedgerError::Overflow)?;

        self.ledger.credit(to, class, quantity)?;
        self.minted.insert(class, updated);

        self.ledger.emit(&LedgerEvent::Mint {
            to: to.clone(),
            class,
            amount: quantity,
        });
        tracing::debug!(%to, %class, %quantity, total = %updated, "minted");
        self.stats
            .add(stats::UNITS_MINTED, u64::try_from(quantity.raw()).unwrap_or(u64::MAX));
        Ok(())
    }

    /// Validate a whole batch against the current ledger state without
    /// applying anything. Conservative: recipients are projected with their
    /// cumulative incoming amounts.
    fn validate_batch(
        &self,
        owner: &HolderAddress,
        recipients: &[HolderAddress],
        quantities: &[TokenCount],
        class: TokenClass,
    ) -> Result<(), IssuerError> {
        let available = self.ledger.balance(owner, class);
        let mut running = TokenCount::ZERO;
        let mut incoming: HashMap<&HolderAddress, TokenCount> = HashMap::new();

        for (index, (to, quantity)) in recipients.iter().zip(quantities).enumerate() {
            running = running
                .checked_add(*quantity)
                .ok_or(IssuerError::BatchFailed {
                    index,
                    source: LedgerError::Overflow,
                })?;
            if running > available {
                return Err(IssuerError::BatchFailed {
                    index,
                    source: LedgerError::InsufficientBalance {
                        needed: running.raw(),
                        available: available.raw(),
                    },
                });
            }

            let credited = incoming.entry(to).or_insert(TokenCount::ZERO);
            *credited = credited
                .checked_add(*quantity)
                .ok_or(IssuerError::BatchFailed {
                    index,
                    source: LedgerError::Overflow,
                })?;
            if self.ledger.balance(to, class).checked_add(*credited).is_none() {
                return Err(IssuerError::BatchFailed {
                    index,
                    source: LedgerError::Overflow,
                });
            }
        }
        Ok(())
    }
}

impl MembershipIssuer {
    /// Capture the full persisted state as a verifiable snapshot.
    pub fn snapshot(&self) -> LodgeSnapshot {
        let mut balances: Vec<BalanceEntry> = self
            .ledger
            .entries()
            .map(|((holder, class), amount)| BalanceEntry {
                holder: holder.clone(),
                class: *class,
                amount: *amount,
            })
            .collect();
        balances.sort_by(|a, b| {
            a.holder
                .as_str()
                .cmp(b.holder.as_str())
                .then(a.class.id().cmp(&b.class.id()))
        });

        LodgeSnapshot {
            hash: [0u8; 32],
            version: SNAPSHOT_VERSION,
            created_at: lodge_types::Timestamp::now(),
            owner: self.authority.owner().clone(),
            entry_fee: self.entry_fee,
            treasury_balance: self.treasury.balance(),
            initialized: self.initialized,
            minted_standard: self.total_minted(TokenClass::Standard),
            minted_genesis: self.total_minted(TokenClass::Genesis),
            balances,
            standard_metadata: self.registry.metadata(TokenClass::Standard).clone(),
            genesis_metadata: self.registry.metadata(TokenClass::Genesis).clone(),
        }
        .seal()
    }

    /// Rebuild an issuer from a snapshot.
    ///
    /// Policy (`params`) is configuration, not persisted state, and is
    /// supplied by the caller; the snapshot's entry fee wins over the
    /// configured one.
    pub fn from_snapshot(
        snapshot: &LodgeSnapshot,
        params: LodgeParams,
    ) -> Result<Self, IssuerError> {
        if !snapshot.verify() {
            return Err(IssuerError::Snapshot("integrity hash mismatch".into()));
        }

        let mut issuer = Self::new(snapshot.owner.clone(), params);
        issuer.entry_fee = snapshot.entry_fee;
        issuer.initialized = snapshot.initialized;
        issuer.treasury = Treasury::with_balance(snapshot.treasury_balance);
        issuer
            .minted
            .insert(TokenClass::Standard, snapshot.minted_standard);
        issuer
            .minted
            .insert(TokenClass::Genesis, snapshot.minted_genesis);
        for entry in &snapshot.balances {
            issuer.ledger.credit(&entry.holder, entry.class, entry.amount)?;
        }
        issuer
            .registry
            .set_name(TokenClass::Standard, snapshot.standard_metadata.name.clone());
        issuer
            .registry
            .set_uri(TokenClass::Standard, snapshot.standard_metadata.uri.clone());
        issuer
            .registry
            .set_name(TokenClass::Genesis, snapshot.genesis_metadata.name.clone());
        issuer
            .registry
            .set_uri(TokenClass::Genesis, snapshot.genesis_metadata.uri.clone());

        Ok(issuer)
    }
}
