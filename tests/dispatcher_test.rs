//! Scenario tests for the tiered dispatcher, driven through the public API.

use bank_queue::{
    AccountHandle, Decimal4, DispatchError, Priority, Tier, TierDispatcher, Transaction,
    TransactionHeap, TxKind,
};
use std::cmp::Ordering;
use std::str::FromStr;

fn dec(s: &str) -> Decimal4 {
    Decimal4::from_str(s).unwrap()
}

fn tx(tx_id: u32, account: &AccountHandle, amount: &str, kind: TxKind) -> Transaction {
    Transaction::new(tx_id, account.clone(), dec(amount), kind).unwrap()
}

// ==================== PRIORITY DERIVATION ====================

#[test]
fn test_priority_derivation() {
    let acc = AccountHandle::open(1, dec("1000"));

    assert_eq!(tx(1, &acc, "0.0001", TxKind::Deposit).priority(), Priority::High);
    assert_eq!(tx(2, &acc, "5000000", TxKind::Deposit).priority(), Priority::High);
    assert_eq!(tx(3, &acc, "0.0001", TxKind::Withdrawal).priority(), Priority::Normal);
    assert_eq!(tx(4, &acc, "5000000", TxKind::Withdrawal).priority(), Priority::Normal);
    assert_eq!(tx(5, &acc, "3000", TxKind::LoanApplication).priority(), Priority::Urgent);
    assert_eq!(tx(6, &acc, "3000.01", TxKind::LoanApplication).priority(), Priority::Low);
}

#[test]
fn test_invalid_amount_mutates_nothing() {
    let acc = AccountHandle::open(1, dec("1000"));
    let err = Transaction::new(1, acc.clone(), dec("-100"), TxKind::Deposit).unwrap_err();

    assert!(matches!(err, DispatchError::InvalidArgument { .. }));
    assert_eq!(acc.balance(), dec("1000"));
}

#[test]
fn test_equal_priority_tie_break_by_balance() {
    let rich = AccountHandle::open(1, dec("2000"));
    let poor = AccountHandle::open(2, dec("1000"));

    let rich_deposit = tx(1, &rich, "100", TxKind::Deposit);
    let poor_deposit = tx(2, &poor, "100", TxKind::Deposit);

    assert_eq!(rich_deposit.compare(&poor_deposit), Ordering::Greater);
    assert!(rich_deposit.outranks(&poor_deposit));
}

// ==================== ROUTING ====================

#[test]
fn test_tier_routing_boundaries() {
    let acc = AccountHandle::open(1, dec("1"));
    let mut manager = TierDispatcher::new(4);

    let cases = [
        ("999.99", Tier::Low),
        ("1000", Tier::Medium),
        ("999999.99", Tier::Medium),
        ("1000000", Tier::High),
    ];
    for (i, (amount, expected)) in cases.into_iter().enumerate() {
        let tier = manager.route(tx(i as u32, &acc, amount, TxKind::Deposit)).unwrap();
        assert_eq!(tier, expected, "amount {}", amount);
    }

    assert_eq!(manager.tier(Tier::Low).len(), 1);
    assert_eq!(manager.tier(Tier::Medium).len(), 2);
    assert_eq!(manager.tier(Tier::High).len(), 1);
}

#[test]
fn test_routing_ignores_priority() {
    let acc = AccountHandle::open(1, dec("1000"));
    let mut manager = TierDispatcher::new(4);

    // Urgent loan of 500 stays in low, Low-priority loan of 2,000,000 goes high
    manager.route(tx(1, &acc, "500", TxKind::LoanApplication)).unwrap();
    manager.route(tx(2, &acc, "2000000", TxKind::LoanApplication)).unwrap();

    assert_eq!(manager.tier(Tier::Low).peek().unwrap().priority(), Priority::Urgent);
    assert_eq!(manager.tier(Tier::High).peek().unwrap().priority(), Priority::Low);
    assert_eq!(manager.next_transaction().unwrap().tx_id(), 2);
}

// ==================== PRECEDENCE ====================

#[test]
fn test_precedence_regardless_of_insertion_order() {
    let orders: [[&str; 3]; 3] = [
        ["10", "5000", "2000000"],
        ["2000000", "10", "5000"],
        ["5000", "2000000", "10"],
    ];

    for amounts in orders {
        let acc = AccountHandle::open(1, dec("1000"));
        let mut manager = TierDispatcher::new(3);
        for (i, amount) in amounts.iter().enumerate() {
            manager.route(tx(i as u32, &acc, amount, TxKind::Deposit)).unwrap();
        }

        let drained: Vec<Decimal4> = (0..3)
            .map(|_| manager.next_transaction().unwrap().amount())
            .collect();
        assert_eq!(drained, vec![dec("2000000"), dec("5000"), dec("10")]);
    }
}

// ==================== CAPACITY ====================

#[test]
fn test_capacity_exceeded_leaves_size_unchanged() {
    let acc = AccountHandle::open(1, dec("1000"));
    let mut heap = TransactionHeap::new(2);
    heap.insert(tx(1, &acc, "1", TxKind::Deposit)).unwrap();
    heap.insert(tx(2, &acc, "2", TxKind::Deposit)).unwrap();

    let err = heap.insert(tx(3, &acc, "3", TxKind::Deposit)).unwrap_err();
    assert!(matches!(err, DispatchError::CapacityExceeded { capacity: 2 }));
    assert_eq!(heap.len(), 2);
}

// ==================== APPLY ====================

#[test]
fn test_end_to_end_deposit() {
    let acc = AccountHandle::open(321, dec("2000"));
    let mut manager = TierDispatcher::new(10);

    manager.route(tx(1, &acc, "800", TxKind::Deposit)).unwrap();
    let applied = manager.apply().unwrap();

    assert_eq!(applied.tx_id(), 1);
    assert_eq!(acc.balance(), dec("2800"));
}

#[test]
fn test_overdraft_drops_operation_and_keeps_balance() {
    let acc = AccountHandle::open(1, dec("800"));
    let mut manager = TierDispatcher::new(10);
    manager.route(tx(1, &acc, "900", TxKind::Withdrawal)).unwrap();
    manager.route(tx(2, &acc, "100", TxKind::Withdrawal)).unwrap();

    // Both withdrawals are Normal against the same account; the 900 one is
    // not guaranteed to come first, so drain until it shows up.
    let mut overdrafts = 0;
    loop {
        match manager.apply() {
            Ok(applied) => assert_eq!(applied.tx_id(), 2),
            Err(DispatchError::Overdraft { amount, .. }) => {
                assert_eq!(amount, dec("900"));
                overdrafts += 1;
            }
            Err(DispatchError::NoTransaction) => break,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(overdrafts, 1);
    assert_eq!(acc.balance(), dec("700"));
}

#[test]
fn test_loan_admission_at_execution_time() {
    let approved = AccountHandle::open(987, dec("3000"));
    let denied = AccountHandle::open(202, dec("2500"));
    let mut manager = TierDispatcher::new(10);

    manager.route(tx(1, &approved, "4000", TxKind::LoanApplication)).unwrap();
    manager.apply().unwrap();
    assert_eq!(approved.balance(), dec("7000"));

    manager.route(tx(2, &denied, "30001", TxKind::LoanApplication)).unwrap();
    assert!(matches!(
        manager.apply(),
        Err(DispatchError::LoanDenied { account: 202, .. })
    ));
    assert_eq!(denied.balance(), dec("2500"));
}

#[test]
fn test_loan_admission_rechecks_current_balance() {
    // 8000 > 3 x 2000, so the loan is queued as Low...
    let acc = AccountHandle::open(5, dec("2000"));
    let mut manager = TierDispatcher::new(10);
    manager.route(tx(1, &acc, "8000", TxKind::LoanApplication)).unwrap();
    assert_eq!(manager.peek_next_transaction().unwrap().priority(), Priority::Low);

    // ...but 8000 <= 10 x 2000 when applied, so it is admitted
    manager.apply().unwrap();
    assert_eq!(acc.balance(), dec("10000"));
}

#[test]
fn test_loan_urgent_at_construction_can_still_be_denied() {
    let acc = AccountHandle::open(5, dec("1000"));
    let loan = tx(1, &acc, "3000", TxKind::LoanApplication);
    assert_eq!(loan.priority(), Priority::Urgent);

    acc.withdraw(dec("900")).unwrap();

    let mut manager = TierDispatcher::new(10);
    manager.route(loan).unwrap();
    assert!(matches!(manager.apply(), Err(DispatchError::LoanDenied { .. })));
    assert_eq!(acc.balance(), dec("100"));
}

#[test]
fn test_empty_dispatcher_signals_no_transaction() {
    let mut manager = TierDispatcher::new(10);

    assert!(matches!(manager.apply(), Err(DispatchError::NoTransaction)));
    assert!(matches!(manager.next_transaction(), Err(DispatchError::NoTransaction)));
    assert!(matches!(
        manager.peek_next_transaction(),
        Err(DispatchError::NoTransaction)
    ));
}

// ==================== LIVE BALANCE ORDERING ====================

#[test]
fn test_balance_mutation_between_inserts_changes_extraction_order() {
    let first = AccountHandle::open(1, dec("1000"));
    let second = AccountHandle::open(2, dec("2000"));
    let mut manager = TierDispatcher::new(10);

    manager.route(tx(1, &first, "10", TxKind::Deposit)).unwrap();

    // A high-tier deposit lifts `first` past `second` before the next insert
    manager.route(tx(2, &first, "5000000", TxKind::Deposit)).unwrap();
    manager.apply().unwrap();
    assert_eq!(first.balance(), dec("5001000"));

    manager.route(tx(3, &second, "10", TxKind::Deposit)).unwrap();

    // Snapshot ordering would have put the 2000 account first
    assert_eq!(manager.next_transaction().unwrap().tx_id(), 1);
    assert_eq!(manager.next_transaction().unwrap().tx_id(), 3);
}

#[test]
fn test_balance_change_during_apply_only_affects_later_sifts() {
    let a = AccountHandle::open(1, dec("500"));
    let b = AccountHandle::open(2, dec("400"));
    let c = AccountHandle::open(3, dec("300"));
    let mut manager = TierDispatcher::new(10);

    manager.route(tx(1, &a, "10", TxKind::Withdrawal)).unwrap();
    manager.route(tx(2, &b, "10", TxKind::Withdrawal)).unwrap();
    manager.route(tx(3, &c, "10", TxKind::Withdrawal)).unwrap();
    manager.route(tx(4, &c, "900", TxKind::Deposit)).unwrap();

    // The deposit is popped first and lifts c to 1200. The new root (a) was
    // chosen while c still held 300, so a comes out next, then c overtakes b.
    assert_eq!(manager.apply().unwrap().tx_id(), 4);
    assert!(!manager.tier(Tier::Low).satisfies_heap_order());
    assert_eq!(manager.apply().unwrap().tx_id(), 1);
    assert_eq!(manager.apply().unwrap().tx_id(), 3);
    assert_eq!(manager.apply().unwrap().tx_id(), 2);
}
