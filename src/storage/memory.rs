use std::collections::HashMap;

use crate::domain::Account;

/// In-memory account store, keyed by account number.
///
/// The entire ledger lives here for the lifetime of the process; nothing is
/// persisted. There is deliberately no removal: accounts are deactivated,
/// never destroyed.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<String, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account under its number, returning any displaced entry.
    pub fn insert(&mut self, account: Account) -> Option<Account> {
        self.accounts.insert(account.number.clone(), account)
    }

    pub fn get(&self, number: &str) -> Option<&Account> {
        self.accounts.get(number)
    }

    pub fn get_mut(&mut self, number: &str) -> Option<&mut Account> {
        self.accounts.get_mut(number)
    }

    pub fn contains(&self, number: &str) -> bool {
        self.accounts.contains_key(number)
    }

    /// Iterate over stored accounts in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
