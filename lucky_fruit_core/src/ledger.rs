//! Per-user balances. Every mutation holds the account's map slot for its whole
//! read-modify-write.

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub balance: u64,
    pub cumulative_winnings: u64,
}

impl Account {
    pub fn with_balance(balance: u64) -> Self {
        Self {
            balance,
            cumulative_winnings: 0,
        }
    }
}

pub struct Ledger {
    accounts: DashMap<String, Account>,
    starting_balance: u64,
}

impl Ledger {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            accounts: DashMap::new(),
            starting_balance,
        }
    }

    // Lookup-or-create under the shard lock; concurrent first access sees one record.
    fn slot(&self, user: &str) -> RefMut<'_, String, Account> {
        if let Some(account) = self.accounts.get_mut(user) {
            return account;
        }
        self.accounts.entry(user.to_string()).or_insert_with(|| {
            debug!(user, balance = self.starting_balance, "opened account");
            Account::with_balance(self.starting_balance)
        })
    }

    /// Opens `user` with an explicit balance. Returns false if the account already existed.
    pub fn open(&self, user: &str, balance: u64) -> bool {
        let mut created = false;
        self.accounts.entry(user.to_string()).or_insert_with(|| {
            created = true;
            Account::with_balance(balance)
        });
        created
    }

    /// Withdraws `amount` if the balance covers it. Returns the account after the debit.
    pub fn debit(&self, user: &str, amount: u64) -> EngineResult<Account> {
        let mut account = self.slot(user);
        if account.balance < amount {
            return Err(EngineError::InsufficientFunds {
                needed: amount,
                available: account.balance,
            });
        }
        account.balance -= amount;
        Ok(*account)
    }

    /// Pays out winnings: raises both the balance and the running winnings total.
    pub fn credit(&self, user: &str, amount: u64) -> Account {
        let mut account = self.slot(user);
        account.balance = account.balance.saturating_add(amount);
        account.cumulative_winnings = account.cumulative_winnings.saturating_add(amount);
        *account
    }

    /// Operator top-up. Winnings are untouched.
    pub fn grant(&self, user: &str, amount: u64) -> Account {
        let mut account = self.slot(user);
        account.balance = account.balance.saturating_add(amount);
        *account
    }

    /// Reads an account. Unseen users read as a fresh account, and none is opened.
    pub fn peek(&self, user: &str) -> Account {
        self.accounts
            .get(user)
            .map(|account| *account)
            .unwrap_or_else(|| Account::with_balance(self.starting_balance))
    }

    /// Snapshot of every account, sorted by user id.
    pub fn accounts(&self) -> Vec<(String, Account)> {
        let mut all: Vec<(String, Account)> = self
            .accounts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_open_with_default() {
        let ledger = Ledger::new(1000);
        assert_eq!(ledger.peek("alice"), Account::with_balance(1000));
        assert!(ledger.is_empty());
        assert_eq!(ledger.debit("alice", 100), Ok(Account::with_balance(900)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_debit_exact_and_short() {
        let ledger = Ledger::new(100);
        assert_eq!(ledger.debit("bob", 100), Ok(Account::with_balance(0)));
        assert_eq!(
            ledger.debit("bob", 1),
            Err(EngineError::InsufficientFunds {
                needed: 1,
                available: 0
            })
        );
        assert_eq!(ledger.peek("bob").balance, 0);
    }

    #[test]
    fn test_credit_tracks_winnings_grant_does_not() {
        let ledger = Ledger::new(0);
        let after = ledger.credit("carol", 500);
        assert_eq!(after.balance, 500);
        assert_eq!(after.cumulative_winnings, 500);
        let after = ledger.grant("carol", 1000);
        assert_eq!(after.balance, 1500);
        assert_eq!(after.cumulative_winnings, 500);
    }

    #[test]
    fn test_open_is_noop_for_existing() {
        let ledger = Ledger::new(1000);
        assert!(ledger.open("Player2", 500));
        assert!(!ledger.open("Player2", 9999));
        assert_eq!(ledger.peek("Player2").balance, 500);
    }

    #[test]
    fn test_accounts_sorted() {
        let ledger = Ledger::new(10);
        ledger.open("zed", 1);
        ledger.open("amy", 2);
        let names: Vec<String> = ledger.accounts().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["amy".to_string(), "zed".to_string()]);
    }
}
