//! Error types for the dispatcher and its batch driver.

use crate::decimal::Decimal4;
use thiserror::Error;

/// Result type alias for dispatcher operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors and signals raised by the heap, the dispatcher and the batch driver.
///
/// None of these are retried internally. `Empty` and `NoTransaction` are the
/// expected steady-state signal once all work is drained.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Operation amount was zero or negative
    #[error("Invalid argument: amount must be positive, got {amount}")]
    InvalidArgument { amount: Decimal4 },

    /// Heap already holds `capacity` operations
    #[error("Transaction heap is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    /// Pop or peek on an empty heap
    #[error("Transaction heap is empty")]
    Empty,

    /// All three tiers are empty
    #[error("No transactions to process")]
    NoTransaction,

    /// Withdrawal exceeds the current balance
    #[error("Overdraft on account {account}: withdrawal of {amount} exceeds balance {balance}")]
    Overdraft {
        account: u16,
        amount: Decimal4,
        balance: Decimal4,
    },

    /// New balance would fall outside the representable range
    #[error("Balance overflow on account {account}: cannot apply {amount} to balance {balance}")]
    BalanceOverflow {
        account: u16,
        amount: Decimal4,
        balance: Decimal4,
    },

    /// Loan failed the execution-time admission check
    #[error("Loan of {amount} denied for account {account}: exceeds limit {limit}")]
    LoanDenied {
        account: u16,
        amount: Decimal4,
        limit: Decimal4,
    },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Capacity argument was not an integer in `1..=max`
    #[error("Invalid capacity '{raw}': expected an integer from 1 to {max}")]
    InvalidCapacity { raw: String, max: usize },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: bank-queue <input.csv> [capacity-per-tier]")]
    MissingArgument,
}
