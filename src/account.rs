//! Account ledger cell and the shared handle operations hold on to.
//!
//! Accounts are owned by the caller. Every queued operation keeps an
//! [`AccountHandle`] to its account, and the heap comparator reads the balance
//! through it at comparison time.

use crate::decimal::Decimal4;
use crate::error::{DispatchError, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// A single account balance.
///
/// # Invariants
///
/// - A withdrawal never takes `balance` below zero; it is rejected instead
/// - A failed deposit or withdrawal leaves `balance` untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Account identifier.
    pub account: u16,

    /// Current balance.
    pub balance: Decimal4,
}

impl Account {
    /// Creates an account with the given opening balance.
    pub fn new(account: u16, balance: Decimal4) -> Self {
        Account { account, balance }
    }

    /// Adds `amount` to the balance.
    ///
    /// Fails with [`DispatchError::BalanceOverflow`] when the new balance would
    /// not be representable, leaving the balance unchanged.
    pub fn deposit(&mut self, amount: Decimal4) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| self.overflow(amount))?;
        Ok(())
    }

    /// Removes `amount` from the balance.
    ///
    /// Fails with [`DispatchError::Overdraft`] when `amount` exceeds the
    /// balance, leaving the balance unchanged.
    pub fn withdraw(&mut self, amount: Decimal4) -> Result<()> {
        if amount > self.balance {
            return Err(DispatchError::Overdraft {
                account: self.account,
                amount,
                balance: self.balance,
            });
        }

        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| self.overflow(amount))?;
        Ok(())
    }

    fn overflow(&self, amount: Decimal4) -> DispatchError {
        DispatchError::BalanceOverflow {
            account: self.account,
            amount,
            balance: self.balance,
        }
    }
}

/// Shared, single-threaded handle to an [`Account`].
///
/// Cloning the handle shares the account; it never copies the balance. No
/// borrow outlives a method call, so a comparator read and a mutation can
/// never overlap.
#[derive(Debug, Clone)]
pub struct AccountHandle(Rc<RefCell<Account>>);

impl AccountHandle {
    pub fn new(account: Account) -> Self {
        AccountHandle(Rc::new(RefCell::new(account)))
    }

    /// Opens a new account with the given balance.
    pub fn open(account: u16, balance: Decimal4) -> Self {
        Self::new(Account::new(account, balance))
    }

    pub fn id(&self) -> u16 {
        self.0.borrow().account
    }

    /// Live balance read.
    pub fn balance(&self) -> Decimal4 {
        self.0.borrow().balance
    }

    pub fn deposit(&self, amount: Decimal4) -> Result<()> {
        self.0.borrow_mut().deposit(amount)
    }

    pub fn withdraw(&self, amount: Decimal4) -> Result<()> {
        self.0.borrow_mut().withdraw(amount)
    }

    /// Returns an owned copy of the account as it is right now.
    pub fn snapshot(&self) -> Account {
        self.0.borrow().clone()
    }

    /// Returns `true` if both handles point at the same account.
    pub fn same_account(&self, other: &AccountHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
