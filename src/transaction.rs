//! Pending operation records and the ordering rule the heaps use.

use crate::account::AccountHandle;
use crate::decimal::Decimal4;
use crate::error::{DispatchError, Result};
use std::cmp::Ordering;
use std::fmt;

/// A loan is `Urgent` at construction when `amount <= balance * 3`.
pub const URGENT_LOAN_MULTIPLIER: u32 = 3;

/// Operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    /// Debit the account, rejected on overdraft.
    Withdrawal,

    /// Credit the account unconditionally.
    Deposit,

    /// Credit the account if the loan passes the execution-time admission check.
    LoanApplication,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxKind::Withdrawal => "withdrawal",
            TxKind::Deposit => "deposit",
            TxKind::LoanApplication => "loan application",
        };
        f.write_str(name)
    }
}

/// Scheduling priority, ordered `Low < Normal < High < Urgent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

/// An operation waiting to be applied to an account.
///
/// Immutable once built. The priority is derived from the account balance at
/// construction and never recomputed, even if the balance later changes.
///
/// # Ordering
///
/// Records rank by priority first, then by the *current* balance of their
/// accounts (higher balance ranks higher). The balance is read live at every
/// comparison, so moving money between inserts can reorder same-priority
/// records already sitting in a heap. Equal priority and equal balance is an
/// unordered tie.
#[derive(Debug)]
pub struct Transaction {
    tx_id: u32,
    account: AccountHandle,
    amount: Decimal4,
    kind: TxKind,
    priority: Priority,
}

impl Transaction {
    /// Builds an operation against `account`.
    ///
    /// Fails with [`DispatchError::InvalidArgument`] if `amount` is not positive.
    pub fn new(
        tx_id: u32,
        account: AccountHandle,
        amount: Decimal4,
        kind: TxKind,
    ) -> Result<Self> {
        if !amount.is_positive() {
            return Err(DispatchError::InvalidArgument { amount });
        }

        let priority = derive_priority(kind, amount, account.balance());
        Ok(Transaction {
            tx_id,
            account,
            amount,
            kind,
            priority,
        })
    }

    pub fn tx_id(&self) -> u32 {
        self.tx_id
    }

    pub fn account(&self) -> &AccountHandle {
        &self.account
    }

    pub fn amount(&self) -> Decimal4 {
        self.amount
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Compares two records by priority, then by live account balance.
    pub fn compare(&self, other: &Transaction) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.account.balance().cmp(&other.account.balance()))
    }

    /// Returns `true` if `self` strictly outranks `other`.
    pub fn outranks(&self, other: &Transaction) -> bool {
        self.compare(other) == Ordering::Greater
    }
}

fn derive_priority(kind: TxKind, amount: Decimal4, balance: Decimal4) -> Priority {
    match kind {
        TxKind::Deposit => Priority::High,
        TxKind::Withdrawal => Priority::Normal,
        TxKind::LoanApplication => {
            if amount <= balance.times(URGENT_LOAN_MULTIPLIER) {
                Priority::Urgent
            } else {
                Priority::Low
            }
        }
    }
}
