//! Three-tier dispatcher that routes operations by amount and applies them.
//!
//! Routing looks only at the amount; ordering inside a tier follows operation
//! priority. The high tier is always drained before medium, and medium before
//! low.

use crate::decimal::Decimal4;
use crate::error::{DispatchError, Result};
use crate::heap::TransactionHeap;
use crate::transaction::{Transaction, TxKind};
use log::debug;
use std::fmt;

/// Amounts at or above this go to the medium tier.
pub const MEDIUM_TIER_THRESHOLD: i64 = 1_000;

/// Amounts at or above this go to the high tier.
pub const HIGH_TIER_THRESHOLD: i64 = 1_000_000;

/// A loan is admitted at apply time when `amount <= balance * 10`.
pub const LOAN_ADMISSION_MULTIPLIER: u32 = 10;

/// Amount bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// Order in which tiers are served.
    pub const PRECEDENCE: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    /// Picks the tier for an operation amount.
    pub fn for_amount(amount: Decimal4) -> Tier {
        if amount >= Decimal4::from(HIGH_TIER_THRESHOLD) {
            Tier::High
        } else if amount >= Decimal4::from(MEDIUM_TIER_THRESHOLD) {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        };
        f.write_str(name)
    }
}

/// Owns one [`TransactionHeap`] per tier, all with the same capacity.
///
/// # Threading
///
/// Single-threaded. Heap comparisons read live account balances, so a caller
/// sharing a dispatcher across threads must serialize every call on it.
#[derive(Debug)]
pub struct TierDispatcher {
    low: TransactionHeap,
    medium: TransactionHeap,
    high: TransactionHeap,
}

impl TierDispatcher {
    /// Creates a dispatcher whose three tiers each hold `capacity_per_tier` operations.
    pub fn new(capacity_per_tier: usize) -> Self {
        TierDispatcher {
            low: TransactionHeap::new(capacity_per_tier),
            medium: TransactionHeap::new(capacity_per_tier),
            high: TransactionHeap::new(capacity_per_tier),
        }
    }

    /// Queues an operation in the tier matching its amount.
    ///
    /// Propagates [`DispatchError::CapacityExceeded`] if that tier is full.
    pub fn route(&mut self, transaction: Transaction) -> Result<Tier> {
        let tier = Tier::for_amount(transaction.amount());
        let tx_id = transaction.tx_id();
        self.tier_mut(tier).insert(transaction)?;
        debug!("Routed transaction {} to {} tier", tx_id, tier);
        Ok(tier)
    }

    /// Removes the next operation, taking from the highest nonempty tier.
    ///
    /// Signals [`DispatchError::NoTransaction`] when every tier is empty.
    pub fn next_transaction(&mut self) -> Result<Transaction> {
        for tier in Tier::PRECEDENCE {
            let heap = self.tier_mut(tier);
            if !heap.is_empty() {
                return heap.extract_max();
            }
        }
        Err(DispatchError::NoTransaction)
    }

    /// Returns the operation `next_transaction` would remove, without removing it.
    pub fn peek_next_transaction(&self) -> Result<&Transaction> {
        Tier::PRECEDENCE
            .into_iter()
            .map(|tier| self.tier(tier))
            .find(|heap| !heap.is_empty())
            .ok_or(DispatchError::NoTransaction)?
            .peek()
    }

    /// Pops the next operation and applies it to its account.
    ///
    /// A rejected operation (overdraft, denied loan, or a deposit the balance
    /// cannot hold) is already out of its heap when the error is returned; it
    /// is dropped and the balance is left unchanged.
    pub fn apply(&mut self) -> Result<Transaction> {
        let transaction = self.next_transaction()?;
        let account = transaction.account();
        let amount = transaction.amount();

        match transaction.kind() {
            TxKind::Withdrawal => account.withdraw(amount)?,
            TxKind::Deposit => account.deposit(amount)?,
            TxKind::LoanApplication => {
                let limit = account.balance().times(LOAN_ADMISSION_MULTIPLIER);
                if amount > limit {
                    return Err(DispatchError::LoanDenied {
                        account: account.id(),
                        amount,
                        limit,
                    });
                }
                account.deposit(amount)?;
            }
        }

        debug!(
            "Applied {} {} of {} to account {}, balance now {}",
            transaction.kind(),
            transaction.tx_id(),
            amount,
            account.id(),
            account.balance()
        );
        Ok(transaction)
    }

    pub fn tier(&self, tier: Tier) -> &TransactionHeap {
        match tier {
            Tier::Low => &self.low,
            Tier::Medium => &self.medium,
            Tier::High => &self.high,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut TransactionHeap {
        match tier {
            Tier::Low => &mut self.low,
            Tier::Medium => &mut self.medium,
            Tier::High => &mut self.high,
        }
    }

    /// Total operations queued across all tiers.
    pub fn pending(&self) -> usize {
        self.low.len() + self.medium.len() + self.high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}
