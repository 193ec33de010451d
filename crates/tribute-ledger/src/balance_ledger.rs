//! Per-account token balances held by the gate.
//!
//! The ledger only knows credits and debits. Moving tokens in and out of
//! pooled custody is the gate's job; the ledger records who owns what once
//! they are inside. All mutations are atomic: either the full operation
//! succeeds or the balance is unchanged.

use std::collections::HashMap;

use tribute_types::{AccountId, Amount, Result, TributeError};

/// Source of truth for ledger balances.
///
/// Escrowed tribute is *not* part of any balance: requesting an audience
/// debits the requester here and the amount lives in the audience record
/// until resolution credits it back or pays it out.
#[derive(Debug, Default)]
pub struct BalanceLedger {
    /// Per-account balances. Zero balances are pruned.
    balances: HashMap<AccountId, Amount>,
}

impl BalanceLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Increase an account's balance.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the result is not representable.
    pub fn credit(&mut self, account: AccountId, amount: Amount) -> Result<()> {
        let current = self.balance_of(account);
        let updated = current
            .checked_add(amount)
            .ok_or(TributeError::BalanceOverflow { account })?;
        if updated > 0 {
            self.balances.insert(account, updated);
        }
        Ok(())
    }

    /// Whether `credit(account, amount)` would succeed.
    #[must_use]
    pub fn can_credit(&self, account: AccountId, amount: Amount) -> bool {
        self.balance_of(account).checked_add(amount).is_some()
    }

    /// Decrease an account's balance.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if balance < amount.
    pub fn debit(&mut self, account: AccountId, amount: Amount) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(TributeError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        let remaining = available - amount;
        if remaining == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, remaining);
        }
        Ok(())
    }

    /// Get the balance of an account (zero if never credited).
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Sum of all balances, saturating on overflow.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.balances
            .values()
            .fold(0, |acc: Amount, v| acc.saturating_add(*v))
    }

    /// Number of accounts with a non-zero balance.
    #[must_use]
    pub fn accounts(&self) -> usize {
        self.balances.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_increases_balance() {
        let mut ledger = BalanceLedger::new();
        let user = AccountId::new();
        ledger.credit(user, 1000).unwrap();
        assert_eq!(ledger.balance_of(user), 1000);
        assert_eq!(ledger.accounts(), 1);
    }

    #[test]
    fn debit_decreases_balance() {
        let mut ledger = BalanceLedger::new();
        let user = AccountId::new();
        ledger.credit(user, 1000).unwrap();
        ledger.debit(user, 400).unwrap();
        assert_eq!(ledger.balance_of(user), 600);
    }

    #[test]
    fn debit_insufficient_fails() {
        let mut ledger = BalanceLedger::new();
        let user = AccountId::new();
        ledger.credit(user, 100).unwrap();
        let err = ledger.debit(user, 200).unwrap_err();
        assert!(matches!(
            err,
            TributeError::InsufficientBalance {
                needed: 200,
                available: 100
            }
        ));
        // Balance unchanged
        assert_eq!(ledger.balance_of(user), 100);
    }

    #[test]
    fn debit_to_zero_prunes_account() {
        let mut ledger = BalanceLedger::new();
        let user = AccountId::new();
        ledger.credit(user, 50).unwrap();
        ledger.debit(user, 50).unwrap();
        assert_eq!(ledger.balance_of(user), 0);
        assert_eq!(ledger.accounts(), 0);
    }

    #[test]
    fn zero_debit_on_empty_account_is_ok() {
        let mut ledger = BalanceLedger::new();
        ledger.debit(AccountId::new(), 0).unwrap();
        assert_eq!(ledger.accounts(), 0);
    }

    #[test]
    fn credit_overflow_fails_without_mutation() {
        let mut ledger = BalanceLedger::new();
        let user = AccountId::new();
        ledger.credit(user, Amount::MAX).unwrap();
        assert!(!ledger.can_credit(user, 1));
        let err = ledger.credit(user, 1).unwrap_err();
        assert!(matches!(err, TributeError::BalanceOverflow { .. }));
        assert_eq!(ledger.balance_of(user), Amount::MAX);
    }

    #[test]
    fn total_sums_all_accounts() {
        let mut ledger = BalanceLedger::new();
        ledger.credit(AccountId::new(), 1000).unwrap();
        ledger.credit(AccountId::new(), 500).unwrap();
        assert_eq!(ledger.total(), 1500);
    }

    #[test]
    fn nonexistent_balance_is_zero() {
        let ledger = BalanceLedger::new();
        assert_eq!(ledger.balance_of(AccountId::new()), 0);
    }
}
