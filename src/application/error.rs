use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{format_cents, Cents};

/// Failure modes of ledger operations. Amounts in messages are rendered
/// through `format_cents`, so they always show two fraction digits.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount for {operation}: {}", format_cents(*.amount))]
    InvalidAmount {
        operation: &'static str,
        amount: Cents,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Account {number} has been inactive since {since}")]
    AccountInactive { number: String, since: NaiveDate },

    #[error(
        "Insufficient funds in account {number}: balance {}, requested {}",
        format_cents(*.balance),
        format_cents(*.requested)
    )]
    InsufficientFunds {
        number: String,
        balance: Cents,
        requested: Cents,
    },

    /// Wrapper for any failure inside a transfer. The underlying error is
    /// kept as the source so callers can still tell the cases apart.
    #[error("Transfer of {} from account {from} to {to} failed", format_cents(*.amount))]
    TransferFailed {
        from: String,
        to: String,
        amount: Cents,
        #[source]
        cause: Box<LedgerError>,
    },
}
