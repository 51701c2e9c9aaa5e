//! End-to-end flows through the full operation surface.

use std::sync::{Arc, Mutex};

use lodge_issuer::{IssuerError, MembershipIssuer};
use lodge_ledger::{LedgerError, LedgerEvent};
use lodge_treasury::{PayoutOutlet, ReentrancyLock, TreasuryError};
use lodge_types::{BatchMode, CoinAmount, HolderAddress, LodgeParams, TokenClass, TokenCount};

const STANDARD: u16 = 1;

fn holder(s: &str) -> HolderAddress {
    HolderAddress::new(format!("ldg_{s}"))
}

fn owner() -> HolderAddress {
    holder("owner")
}

fn make_issuer() -> MembershipIssuer {
    MembershipIssuer::new(owner(), LodgeParams::default())
}

/// Outlet that accepts every delivery and records it.
struct AcceptingOutlet {
    delivered: Vec<(HolderAddress, CoinAmount)>,
}

impl AcceptingOutlet {
    fn new() -> Self {
        Self {
            delivered: Vec::new(),
        }
    }
}

impl PayoutOutlet for AcceptingOutlet {
    fn deliver(&mut self, to: &HolderAddress, amount: CoinAmount) -> Result<(), String> {
        self.delivered.push((to.clone(), amount));
        Ok(())
    }
}

/// Outlet that rejects every delivery.
struct RejectingOutlet;

impl PayoutOutlet for RejectingOutlet {
    fn deliver(&mut self, _to: &HolderAddress, _amount: CoinAmount) -> Result<(), String> {
        Err("recipient refused the transfer".into())
    }
}

/// Outlet that attempts a nested guarded operation through a shared lock
/// handle, simulating a recipient calling back into the system.
struct ReentrantOutlet {
    lock: ReentrancyLock,
    nested_result: Option<Result<(), TreasuryError>>,
}

impl PayoutOutlet for ReentrantOutlet {
    fn deliver(&mut self, _to: &HolderAddress, _amount: CoinAmount) -> Result<(), String> {
        self.nested_result = Some(self.lock.acquire().map(drop));
        Ok(())
    }
}

#[test]
fn founding_sale_scenario() {
    // Owner mints 1000 Standard to self, legislates a fee of 90, and a
    // member buys exactly one unit with exact payment.
    let mut issuer = make_issuer();
    issuer
        .mint_standard_to_self(&owner(), TokenCount::new(1000))
        .unwrap();
    assert_eq!(issuer.total_minted(TokenClass::Standard), TokenCount::new(1000));
    assert_eq!(
        issuer.balance_of(&owner(), TokenClass::Standard),
        TokenCount::new(1000)
    );

    issuer.set_entry_fee(&owner(), CoinAmount::new(90)).unwrap();

    issuer
        .apply_for_membership(&holder("alice"), TokenCount::new(1), CoinAmount::new(90))
        .unwrap();

    assert_eq!(
        issuer.balance_of(&holder("alice"), TokenClass::Standard),
        TokenCount::new(1)
    );
    assert_eq!(
        issuer.balance_of(&owner(), TokenClass::Standard),
        TokenCount::new(999)
    );
    assert_eq!(issuer.treasury_balance(), CoinAmount::new(90));
}

#[test]
fn underpayment_changes_nothing() {
    let mut issuer = make_issuer();
    issuer.initialize(&owner()).unwrap();
    issuer.set_entry_fee(&owner(), CoinAmount::new(90)).unwrap();

    let result =
        issuer.apply_for_membership(&holder("alice"), TokenCount::new(2), CoinAmount::new(179));
    match result.unwrap_err() {
        IssuerError::Treasury(TreasuryError::InsufficientPayment { required, attached }) => {
            assert_eq!(required, 180);
            assert_eq!(attached, 179);
        }
        other => panic!("expected InsufficientPayment, got {other:?}"),
    }

    assert_eq!(
        issuer.balance_of(&holder("alice"), TokenClass::Standard),
        TokenCount::ZERO
    );
    assert_eq!(
        issuer.balance_of(&owner(), TokenClass::Standard),
        TokenCount::new(1000)
    );
    assert_eq!(issuer.treasury_balance(), CoinAmount::ZERO);
}

#[test]
fn excess_payment_is_kept_by_the_treasury() {
    let mut issuer = make_issuer();
    issuer.initialize(&owner()).unwrap();
    issuer.set_entry_fee(&owner(), CoinAmount::new(90)).unwrap();

    issuer
        .apply_for_membership(&holder("alice"), TokenCount::new(1), CoinAmount::new(250))
        .unwrap();

    assert_eq!(issuer.treasury_balance(), CoinAmount::new(250));
    assert_eq!(
        issuer.balance_of(&holder("alice"), TokenClass::Standard),
        TokenCount::new(1)
    );
}

#[test]
fn acquisition_never_mints_on_demand() {
    // The public path draws from the owner's pre-minted pool; an empty pool
    // fails the sale even with ample payment.
    let mut issuer = make_issuer();
    issuer.set_entry_fee(&owner(), CoinAmount::new(1)).unwrap();

    let result =
        issuer.apply_for_membership(&holder("alice"), TokenCount::new(5), CoinAmount::new(100));
    assert!(matches!(
        result,
        Err(IssuerError::Ledger(LedgerError::InsufficientBalance { .. }))
    ));

    assert_eq!(issuer.total_minted(TokenClass::Standard), TokenCount::ZERO);
    assert_eq!(issuer.treasury_balance(), CoinAmount::ZERO);
}

#[test]
fn extreme_quantity_cannot_wrap_the_payment_check() {
    let mut issuer = make_issuer();
    issuer.initialize(&owner()).unwrap();
    issuer
        .set_entry_fee(&owner(), CoinAmount::new(u128::MAX / 2))
        .unwrap();

    let result =
        issuer.apply_for_membership(&holder("alice"), TokenCount::new(4), CoinAmount::new(1));
    assert!(matches!(
        result,
        Err(IssuerError::Treasury(TreasuryError::Overflow))
    ));
    assert_eq!(issuer.treasury_balance(), CoinAmount::ZERO);
}

#[test]
fn non_owner_privileged_calls_change_nothing() {
    let mut issuer = make_issuer();
    issuer.initialize(&owner()).unwrap();
    let mallory = holder("mallory");

    assert!(issuer
        .issue(&mallory, &mallory, STANDARD, TokenCount::new(10))
        .is_err());
    assert!(issuer.set_entry_fee(&mallory, CoinAmount::new(1)).is_err());
    assert!(issuer
        .mint_standard_to_self(&mallory, TokenCount::new(10))
        .is_err());
    assert!(issuer
        .airdrop(&mallory, &[holder("a")], &[TokenCount::new(1)], STANDARD)
        .is_err());
    assert!(issuer
        .withdraw_treasury(&mallory, &mut AcceptingOutlet::new())
        .is_err());
    assert!(issuer.set_uri(&mallory, STANDARD, "x").is_err());
    assert!(issuer.transfer_ownership(&mallory, mallory.clone()).is_err());

    assert_eq!(issuer.owner(), &owner());
    assert_eq!(issuer.entry_fee(), CoinAmount::ZERO);
    assert_eq!(issuer.total_minted(TokenClass::Standard), TokenCount::new(1000));
    assert_eq!(issuer.balance_of(&mallory, TokenClass::Standard), TokenCount::ZERO);
}

#[test]
fn withdrawal_is_atomic_against_rejection() {
    let mut issuer = make_issuer();
    issuer.initialize(&owner()).unwrap();
    issuer.set_entry_fee(&owner(), CoinAmount::new(90)).unwrap();
    issuer
        .apply_for_membership(&holder("alice"), TokenCount::new(3), CoinAmount::new(270))
        .unwrap();

    // Rejected payout: treasury unchanged.
    let result = issuer.withdraw_treasury(&owner(), &mut RejectingOutlet);
    assert!(matches!(
        result,
        Err(IssuerError::Treasury(TreasuryError::TransferFailed(_)))
    ));
    assert_eq!(issuer.treasury_balance(), CoinAmount::new(270));

    // Accepted payout: full balance delivered, treasury zeroed.
    let mut outlet = AcceptingOutlet::new();
    let delivered = issuer.withdraw_treasury(&owner(), &mut outlet).unwrap();
    assert_eq!(delivered, CoinAmount::new(270));
    assert_eq!(issuer.treasury_balance(), CoinAmount::ZERO);
    assert_eq!(outlet.delivered, vec![(owner(), CoinAmount::new(270))]);
}

#[test]
fn reentrant_callback_is_blocked_during_withdrawal() {
    let mut issuer = make_issuer();
    issuer.initialize(&owner()).unwrap();
    issuer.receive_deposit(&holder("alice"), CoinAmount::new(50)).unwrap();

    let mut outlet = ReentrantOutlet {
        lock: issuer.reentrancy_lock(),
        nested_result: None,
    };
    issuer.withdraw_treasury(&owner(), &mut outlet).unwrap();

    // The nested acquire inside the outlet callback saw the lock held.
    assert_eq!(
        outlet.nested_result,
        Some(Err(TreasuryError::ReentrancyBlocked))
    );
    // And the lock released once the operation finished.
    assert!(!issuer.reentrancy_lock().is_held());
}

#[test]
fn best_effort_batch_stops_at_first_failure() {
    let mut issuer = make_issuer();
    issuer
        .mint_standard_to_self(&owner(), TokenCount::new(10))
        .unwrap();

    let recipients = [holder("r1"), holder("r2"), holder("r3")];
    let quantities = [
        TokenCount::new(8),
        TokenCount::new(5), // exceeds the 2 remaining after r1
        TokenCount::new(1),
    ];

    let result = issuer.airdrop(&owner(), &recipients, &quantities, STANDARD);
    match result.unwrap_err() {
        IssuerError::BatchFailed { index, source } => {
            assert_eq!(index, 1);
            assert!(matches!(source, LedgerError::InsufficientBalance { .. }));
        }
        other => panic!("expected BatchFailed, got {other:?}"),
    }

    // Sequential-commit policy: the first transfer stands, nothing after
    // the failing element was attempted.
    assert_eq!(
        issuer.balance_of(&holder("r1"), TokenClass::Standard),
        TokenCount::new(8)
    );
    assert_eq!(issuer.balance_of(&holder("r2"), TokenClass::Standard), TokenCount::ZERO);
    assert_eq!(issuer.balance_of(&holder("r3"), TokenClass::Standard), TokenCount::ZERO);
    assert_eq!(
        issuer.balance_of(&owner(), TokenClass::Standard),
        TokenCount::new(2)
    );
}

#[test]
fn all_or_nothing_batch_applies_nothing_on_failure() {
    let mut params = LodgeParams::default();
    params.batch_mode = BatchMode::AllOrNothing;
    let mut issuer = MembershipIssuer::new(owner(), params);
    issuer
        .mint_standard_to_self(&owner(), TokenCount::new(10))
        .unwrap();

    let recipients = [holder("r1"), holder("r2"), holder("r3")];
    let quantities = [TokenCount::new(8), TokenCount::new(5), TokenCount::new(1)];

    let result = issuer.airdrop(&owner(), &recipients, &quantities, STANDARD);
    assert!(matches!(
        result,
        Err(IssuerError::BatchFailed { index: 1, .. })
    ));

    // Whole-batch rollback policy: nobody received anything.
    for r in &recipients {
        assert_eq!(issuer.balance_of(r, TokenClass::Standard), TokenCount::ZERO);
    }
    assert_eq!(
        issuer.balance_of(&owner(), TokenClass::Standard),
        TokenCount::new(10)
    );
}

#[test]
fn batch_length_mismatch_rejects_before_any_transfer() {
    let mut issuer = make_issuer();
    issuer
        .mint_standard_to_self(&owner(), TokenCount::new(10))
        .unwrap();

    let result = issuer.airdrop(
        &owner(),
        &[holder("r1"), holder("r2")],
        &[TokenCount::new(1)],
        STANDARD,
    );
    assert_eq!(
        result,
        Err(IssuerError::LengthMismatch {
            recipients: 2,
            quantities: 1,
        })
    );
    assert_eq!(issuer.balance_of(&holder("r1"), TokenClass::Standard), TokenCount::ZERO);
}

#[test]
fn successful_airdrop_reaches_every_recipient() {
    let mut issuer = make_issuer();
    issuer
        .mint_standard_to_self(&owner(), TokenCount::new(10))
        .unwrap();

    let recipients = [holder("r1"), holder("r2"), holder("r3")];
    let quantities = [TokenCount::new(3), TokenCount::new(2), TokenCount::new(1)];
    issuer
        .airdrop(&owner(), &recipients, &quantities, STANDARD)
        .unwrap();

    assert_eq!(issuer.balance_of(&holder("r1"), TokenClass::Standard), TokenCount::new(3));
    assert_eq!(issuer.balance_of(&holder("r2"), TokenClass::Standard), TokenCount::new(2));
    assert_eq!(issuer.balance_of(&holder("r3"), TokenClass::Standard), TokenCount::new(1));
    assert_eq!(
        issuer.balance_of(&owner(), TokenClass::Standard),
        TokenCount::new(4)
    );
}

#[test]
fn bare_deposits_accumulate_in_the_treasury() {
    let mut issuer = make_issuer();
    issuer.receive_deposit(&holder("anon"), CoinAmount::new(40)).unwrap();
    issuer.receive_deposit(&holder("anon"), CoinAmount::new(2)).unwrap();
    assert_eq!(issuer.treasury_balance(), CoinAmount::new(42));
}

#[test]
fn sales_emit_transfer_and_deposit_events() {
    let mut issuer = make_issuer();
    issuer.initialize(&owner()).unwrap();
    issuer.set_entry_fee(&owner(), CoinAmount::new(90)).unwrap();

    let seen: Arc<Mutex<Vec<LedgerEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    issuer.subscribe(Box::new(move |event| {
        sink.lock().unwrap().push(event.clone());
    }));

    issuer
        .apply_for_membership(&holder("alice"), TokenCount::new(1), CoinAmount::new(90))
        .unwrap();

    let events = seen.lock().unwrap();
    assert_eq!(
        events.as_slice(),
        &[
            LedgerEvent::Transfer {
                from: owner(),
                to: holder("alice"),
                class: TokenClass::Standard,
                amount: TokenCount::new(1),
            },
            LedgerEvent::Deposit {
                from: holder("alice"),
                amount: CoinAmount::new(90),
            },
        ]
    );
}

#[test]
fn mint_counters_track_classes_independently() {
    let mut issuer = make_issuer();
    issuer.initialize(&owner()).unwrap();
    issuer
        .issue(&owner(), &holder("alice"), 2, TokenCount::new(5))
        .unwrap();

    assert_eq!(issuer.total_minted(TokenClass::Standard), TokenCount::new(1000));
    assert_eq!(issuer.total_minted(TokenClass::Genesis), TokenCount::new(105));
}
