//! # Bank Queue
//!
//! Orders pending account operations through three amount-based tiers of
//! fixed-capacity priority heaps, then applies them to account balances one
//! at a time.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Uses 4 decimal places via `rust_decimal`
//! - **Bounded queues**: Each tier has a fixed capacity and never resizes
//! - **Tier precedence**: High (>= 1,000,000) drains before medium (>= 1,000) before low
//! - **Live ordering**: Same-priority operations rank by their account's current balance
//! - **Fail fast**: Rejected operations surface an error and are never retried
//!
//! ## Example
//!
//! ```
//! use bank_queue::{AccountHandle, Decimal4, TierDispatcher, Transaction, TxKind};
//!
//! let account = AccountHandle::open(321, Decimal4::from(2000));
//! let deposit = Transaction::new(1, account.clone(), Decimal4::from(800), TxKind::Deposit).unwrap();
//!
//! let mut dispatcher = TierDispatcher::new(10);
//! dispatcher.route(deposit).unwrap();
//! dispatcher.apply().unwrap();
//! assert_eq!(account.balance(), Decimal4::from(2800));
//! ```

pub mod account;
pub mod decimal;
pub mod dispatcher;
pub mod error;
pub mod heap;
pub mod processor;
pub mod record;
pub mod transaction;

pub use account::{Account, AccountHandle};
pub use decimal::Decimal4;
pub use dispatcher::{Tier, TierDispatcher};
pub use error::{DispatchError, Result};
pub use heap::TransactionHeap;
pub use processor::{BatchProcessor, ProcessorConfig, SettlementReport};
pub use record::{InputRecord, ParsedRecord, RecordAction};
pub use transaction::{Priority, Transaction, TxKind};
