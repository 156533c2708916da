use chrono::NaiveDate;
use serde::Serialize;

use super::Cents;

/// A customer account in the ledger.
/// Number and owner are fixed when the account is opened; only the balance
/// and the deactivation stamp change afterwards. Accounts are never deleted,
/// only deactivated.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Caller-assigned account number, unique within the ledger
    pub number: String,
    /// Display name of the account holder
    pub owner: String,
    /// Current balance in cents
    pub balance_cents: Cents,
    /// Deactivation date; `None` while the account is active
    pub deactivated_on: Option<NaiveDate>,
}

impl Account {
    /// Open an account with an opening balance. The service validates the
    /// amount before calling this; the assert is the construction guarantee.
    pub fn open(number: impl Into<String>, owner: impl Into<String>, initial_cents: Cents) -> Self {
        assert!(initial_cents >= 0, "Opening balance must not be negative");
        Self {
            number: number.into(),
            owner: owner.into(),
            balance_cents: initial_cents,
            deactivated_on: None,
        }
    }

    /// Add to the balance. Inactive accounts still take credits; eligibility
    /// rules live in the service layer.
    pub fn credit(&mut self, amount: Cents) {
        self.balance_cents += amount;
    }

    /// Subtract from the balance. The service checks status and funds first.
    pub fn debit(&mut self, amount: Cents) {
        self.balance_cents -= amount;
    }

    /// Mark the account inactive as of `on`. One-way and write-once: a
    /// second call leaves the original stamp in place.
    pub fn deactivate(&mut self, on: NaiveDate) {
        if self.deactivated_on.is_none() {
            self.deactivated_on = Some(on);
        }
    }

    pub fn is_active(&self) -> bool {
        self.deactivated_on.is_none()
    }
}
