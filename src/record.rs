//! Input rows for the batch driver.

use crate::decimal::Decimal4;
use crate::transaction::TxKind;
use serde::Deserialize;
use std::str::FromStr;

/// Raw row as read from CSV: `type,account,tx,amount`.
#[derive(Debug, Deserialize)]
pub struct InputRecord {
    /// Row type: open, deposit, withdrawal, loan
    #[serde(rename = "type")]
    pub row_type: String,

    /// Account ID (u16)
    pub account: u16,

    /// Row ID (u32), becomes the transaction ID for queued operations
    pub tx: u32,

    /// Opening balance for `open`, operation amount otherwise
    pub amount: Option<String>,
}

impl InputRecord {
    /// Parses the raw row into a typed record.
    ///
    /// Returns `None` for unknown types and missing or malformed amounts.
    /// Amount sign is checked later: `open` rejects negatives and operations
    /// reject non-positive amounts at construction.
    pub fn parse(&self) -> Option<ParsedRecord> {
        let row_type = self.row_type.trim().to_lowercase();
        let amount = self.parse_amount()?;

        let action = match row_type.as_str() {
            "open" => RecordAction::Open(amount),
            "deposit" => RecordAction::Queue(TxKind::Deposit, amount),
            "withdrawal" => RecordAction::Queue(TxKind::Withdrawal, amount),
            "loan" | "loan_application" => RecordAction::Queue(TxKind::LoanApplication, amount),
            _ => return None,
        };

        Some(ParsedRecord {
            tx_id: self.tx,
            account: self.account,
            action,
        })
    }

    fn parse_amount(&self) -> Option<Decimal4> {
        let trimmed = self.amount.as_ref()?.trim();
        if trimmed.is_empty() {
            return None;
        }
        Decimal4::from_str(trimmed).ok()
    }
}

/// A typed input row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub tx_id: u32,
    pub account: u16,
    pub action: RecordAction,
}

/// What an input row asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordAction {
    /// Create the account with this opening balance.
    Open(Decimal4),

    /// Build an operation of this kind and amount and route it.
    Queue(TxKind, Decimal4),
}
