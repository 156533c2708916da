use chrono::Utc;

use crate::domain::{Account, Cents};
use crate::storage::AccountStore;

use super::LedgerError;

/// Application service providing the ledger's operations.
/// This is the primary interface for any client (CLI, tests, a future API).
/// Mutating operations take `&mut self`, so exclusive access is enforced by
/// the borrow checker; sharing the service across threads requires a lock
/// at the call site.
pub struct LedgerService {
    store: AccountStore,
}

impl LedgerService {
    /// Create a service with an empty ledger.
    pub fn new() -> Self {
        Self {
            store: AccountStore::new(),
        }
    }

    /// Create a service over an existing store.
    pub fn with_store(store: AccountStore) -> Self {
        Self { store }
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account. The opening balance may be zero but never
    /// negative, and the number must not be in use.
    pub fn create_account(
        &mut self,
        number: &str,
        owner: &str,
        initial_cents: Cents,
    ) -> Result<Account, LedgerError> {
        // Validate before touching the store
        if initial_cents < 0 {
            return Err(LedgerError::InvalidAmount {
                operation: "create account",
                amount: initial_cents,
            });
        }
        if self.store.contains(number) {
            return Err(LedgerError::AccountExists(number.to_string()));
        }

        let account = Account::open(number, owner, initial_cents);
        self.store.insert(account.clone());
        Ok(account)
    }

    /// Look up an account by number. Returns a snapshot copy.
    pub fn get_account(&self, number: &str) -> Result<Account, LedgerError> {
        Ok(self.account(number)?.clone())
    }

    /// Current balance of an account.
    pub fn get_balance(&self, number: &str) -> Result<Cents, LedgerError> {
        Ok(self.account(number)?.balance_cents)
    }

    /// All accounts, sorted by number. Map order is arbitrary and reports
    /// need a stable one.
    pub fn list_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.store.iter().cloned().collect();
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        accounts
    }

    /// Deactivate an account, stamping today's date. Deactivating an already
    /// inactive account succeeds and keeps the original stamp.
    pub fn deactivate_account(&mut self, number: &str) -> Result<Account, LedgerError> {
        let account = self.account_mut(number)?;
        account.deactivate(Utc::now().date_naive());
        Ok(account.clone())
    }

    // ========================
    // Money movement
    // ========================

    /// Deposit into an account.
    /// Inactive accounts accept deposits: money may always be paid in.
    pub fn deposit(&mut self, number: &str, amount: Cents) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount {
                operation: "deposit",
                amount,
            });
        }

        self.account_mut(number)?.credit(amount);
        Ok(())
    }

    /// Withdraw from an account.
    /// Check order is contractual: amount, existence, status, then funds.
    pub fn withdraw(&mut self, number: &str, amount: Cents) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount {
                operation: "withdraw",
                amount,
            });
        }

        let account = self.account_mut(number)?;
        if let Some(since) = account.deactivated_on {
            return Err(LedgerError::AccountInactive {
                number: number.to_string(),
                since,
            });
        }
        if account.balance_cents < amount {
            return Err(LedgerError::InsufficientFunds {
                number: number.to_string(),
                balance: account.balance_cents,
                requested: amount,
            });
        }

        account.debit(amount);
        Ok(())
    }

    /// Move money between two accounts. Any failure comes back as
    /// `TransferFailed` with the underlying error preserved as its source.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Cents) -> Result<(), LedgerError> {
        self.execute_transfer(from, to, amount)
            .map_err(|cause| LedgerError::TransferFailed {
                from: from.to_string(),
                to: to.to_string(),
                amount,
                cause: Box::new(cause),
            })
    }

    /// Transfer body. Everything is validated before a single cent moves,
    /// so a failed transfer never leaves a half-applied state.
    fn execute_transfer(&mut self, from: &str, to: &str, amount: Cents) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount {
                operation: "transfer",
                amount,
            });
        }

        // Source is checked before destination, status before funds.
        let source = self.account(from)?;
        if !self.store.contains(to) {
            return Err(LedgerError::AccountNotFound(to.to_string()));
        }
        if let Some(since) = source.deactivated_on {
            return Err(LedgerError::AccountInactive {
                number: from.to_string(),
                since,
            });
        }
        if source.balance_cents < amount {
            return Err(LedgerError::InsufficientFunds {
                number: from.to_string(),
                balance: source.balance_cents,
                requested: amount,
            });
        }

        // The destination's status is deliberately not checked: inactive
        // accounts still receive money, same as deposits.
        self.account_mut(from)?.debit(amount);
        self.account_mut(to)?.credit(amount);
        Ok(())
    }

    // ========================
    // Lookups
    // ========================

    fn account(&self, number: &str) -> Result<&Account, LedgerError> {
        self.store
            .get(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))
    }

    fn account_mut(&mut self, number: &str) -> Result<&mut Account, LedgerError> {
        self.store
            .get_mut(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
