//! Batch driver over the dispatcher.
//!
//! Reads a CSV of account openings and pending operations, queues every
//! operation in file order, then settles the queue and reports final balances.

use crate::account::AccountHandle;
use crate::decimal::Decimal4;
use crate::dispatcher::TierDispatcher;
use crate::error::{DispatchError, Result};
use crate::record::{InputRecord, ParsedRecord, RecordAction};
use crate::transaction::Transaction;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::{Read, Write};

/// Batch driver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Capacity of each of the three dispatcher tiers.
    pub capacity_per_tier: usize,
}

impl ProcessorConfig {
    pub const DEFAULT_CAPACITY_PER_TIER: usize = 1024;

    /// Largest accepted capacity. All three tiers reserve their slots up
    /// front, so this bounds the allocation made at startup.
    pub const MAX_CAPACITY_PER_TIER: usize = 1_000_000;

    /// Builds a config from a user-supplied capacity string.
    ///
    /// Accepts integers from 1 to [`Self::MAX_CAPACITY_PER_TIER`].
    pub fn from_capacity_arg(raw: &str) -> Result<Self> {
        match raw.trim().parse::<usize>() {
            Ok(capacity) if (1..=Self::MAX_CAPACITY_PER_TIER).contains(&capacity) => {
                Ok(ProcessorConfig {
                    capacity_per_tier: capacity,
                })
            }
            _ => Err(DispatchError::InvalidCapacity {
                raw: raw.to_string(),
                max: Self::MAX_CAPACITY_PER_TIER,
            }),
        }
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            capacity_per_tier: Self::DEFAULT_CAPACITY_PER_TIER,
        }
    }
}

/// Counts from one settlement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementReport {
    /// Operations applied to their accounts.
    pub applied: usize,

    /// Withdrawals rejected for insufficient balance.
    pub overdrafts: usize,

    /// Loans rejected by the admission check.
    pub denied_loans: usize,

    /// Deposits and loans rejected because the balance could not hold them.
    pub overflows: usize,

    /// Operations that never got queued because their tier was full.
    pub dropped: usize,
}

/// Loads accounts and operations, then settles them through a [`TierDispatcher`].
pub struct BatchProcessor {
    /// Accounts indexed by account ID.
    accounts: HashMap<u16, AccountHandle>,

    dispatcher: TierDispatcher,

    /// Routing drops since the last settlement.
    dropped: usize,
}

impl BatchProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        BatchProcessor {
            accounts: HashMap::new(),
            dispatcher: TierDispatcher::new(config.capacity_per_tier),
            dropped: 0,
        }
    }

    /// Reads rows from CSV, opening accounts and queueing operations.
    ///
    /// Invalid rows are logged at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<InputRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse() {
                    Some(parsed) => {
                        if let Err(e) = self.process_record(parsed, row_num) {
                            warn!("Row {}: {}", row_num, e);
                        }
                    }
                    None => warn!("Row {}: Failed to parse input record", row_num),
                },
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }

        Ok(())
    }

    fn process_record(&mut self, record: ParsedRecord, row: usize) -> Result<()> {
        match record.action {
            RecordAction::Open(balance) => {
                self.open_account(record.account, balance, row);
                Ok(())
            }
            RecordAction::Queue(kind, amount) => {
                let Some(account) = self.accounts.get(&record.account) else {
                    warn!(
                        "Row {}: Unknown account {} for transaction {}, ignoring",
                        row, record.account, record.tx_id
                    );
                    return Ok(());
                };

                let transaction = Transaction::new(record.tx_id, account.clone(), amount, kind)?;
                let priority = transaction.priority();
                match self.dispatcher.route(transaction) {
                    Ok(tier) => {
                        debug!(
                            "Row {}: Queued {} {} ({:?}) in {} tier",
                            row, kind, record.tx_id, priority, tier
                        );
                        Ok(())
                    }
                    Err(e @ DispatchError::CapacityExceeded { .. }) => {
                        self.dropped += 1;
                        Err(e)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    fn open_account(&mut self, account: u16, balance: Decimal4, row: usize) {
        if balance.is_negative() {
            warn!(
                "Row {}: Negative opening balance {} for account {}, ignoring",
                row, balance, account
            );
            return;
        }
        if self.accounts.contains_key(&account) {
            warn!("Row {}: Account {} already open, ignoring", row, account);
            return;
        }

        self.accounts.insert(account, AccountHandle::open(account, balance));
        debug!("Row {}: Opened account {} with {}", row, account, balance);
    }

    /// Applies queued operations until the dispatcher runs dry.
    ///
    /// Overdrafts, denied loans and balance overflows are logged and counted;
    /// they do not stop the run.
    pub fn settle(&mut self) -> SettlementReport {
        let mut report = SettlementReport {
            dropped: std::mem::take(&mut self.dropped),
            ..SettlementReport::default()
        };

        loop {
            match self.dispatcher.apply() {
                Ok(_) => report.applied += 1,
                Err(DispatchError::NoTransaction) => break,
                Err(e @ DispatchError::Overdraft { .. }) => {
                    warn!("{}", e);
                    report.overdrafts += 1;
                }
                Err(e @ DispatchError::LoanDenied { .. }) => {
                    warn!("{}", e);
                    report.denied_loans += 1;
                }
                Err(e @ DispatchError::BalanceOverflow { .. }) => {
                    warn!("{}", e);
                    report.overflows += 1;
                }
                Err(e) => warn!("Unexpected settlement error: {}", e),
            }
        }

        debug!("Settlement finished: {:?}", report);
        report
    }

    /// Writes final balances to CSV, sorted by account ID.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        let mut accounts: Vec<_> = self.accounts.values().map(AccountHandle::snapshot).collect();
        accounts.sort_by_key(|a| a.account);

        // Written by hand so an empty run still prints a header
        csv_writer.write_record(["account", "balance"])?;
        for account in accounts {
            csv_writer.serialize(account)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Returns the dispatcher, for inspecting queued work.
    pub fn dispatcher(&self) -> &TierDispatcher {
        &self.dispatcher
    }

    pub fn account(&self, account: u16) -> Option<&AccountHandle> {
        self.accounts.get(&account)
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}
