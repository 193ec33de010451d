//! Token collaborator: moves value in and out of pooled custody.
//!
//! The gate never owns token balances itself; it asks a
//! [`TokenCollaborator`] to pull deposits into its custody account and to
//! push withdrawals and payouts out. Both directions fail on insufficient
//! funds, and the gate treats any failure as an abort of the enclosing
//! operation.

use std::collections::{HashMap, HashSet};

use tribute_types::{AccountId, Amount, Result, TransferOp, TributeError};

/// External fungible-token primitive.
///
/// Calls are synchronous and fallible. A returned error must mean no value
/// moved.
pub trait TokenCollaborator {
    /// Pull `amount` from `payer` into custody.
    fn transfer_from(&mut self, payer: AccountId, amount: Amount) -> Result<()>;

    /// Push `amount` from custody to `to`.
    fn transfer(&mut self, to: AccountId, amount: Amount) -> Result<()>;

    /// Tokens currently held by the custody account.
    fn custody_balance(&self) -> Amount;
}

/// In-memory token with balances, custody allowances and a block list.
///
/// Blocked accounts can neither send nor receive, which lets callers
/// exercise the gate's rollback paths. Transfers from an account to itself
/// are rejected.
#[derive(Debug)]
pub struct InMemoryToken {
    custody: AccountId,
    balances: HashMap<AccountId, Amount>,
    /// Amount each owner has approved custody to pull.
    allowances: HashMap<AccountId, Amount>,
    blocked: HashSet<AccountId>,
}

impl InMemoryToken {
    /// Create a token whose custody account is `custody`.
    #[must_use]
    pub fn new(custody: AccountId) -> Self {
        Self {
            custody,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            blocked: HashSet::new(),
        }
    }

    #[must_use]
    pub fn custody_account(&self) -> AccountId {
        self.custody
    }

    /// Create `amount` new tokens for `account`.
    pub fn mint(&mut self, account: AccountId, amount: Amount) {
        let bal = self.balances.entry(account).or_insert(0);
        *bal = bal.saturating_add(amount);
    }

    /// Set how much custody may pull from `owner`.
    pub fn approve(&mut self, owner: AccountId, amount: Amount) {
        self.allowances.insert(owner, amount);
    }

    /// Mint and approve in one step.
    pub fn fund(&mut self, account: AccountId, amount: Amount) {
        self.mint(account, amount);
        let allowance = self.allowance(account).saturating_add(amount);
        self.approve(account, allowance);
    }

    /// Make every transfer touching `account` fail.
    pub fn block(&mut self, account: AccountId) {
        self.blocked.insert(account);
    }

    pub fn unblock(&mut self, account: AccountId) {
        self.blocked.remove(&account);
    }

    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn allowance(&self, owner: AccountId) -> Amount {
        self.allowances.get(&owner).copied().unwrap_or(0)
    }

    fn move_funds(&mut self, from: AccountId, to: AccountId, amount: Amount) -> std::result::Result<(), String> {
        if from == to {
            return Err(format!("{from} cannot transfer to itself"));
        }
        if self.blocked.contains(&from) {
            return Err(format!("{from} is blocked"));
        }
        if self.blocked.contains(&to) {
            return Err(format!("{to} is blocked"));
        }
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(format!(
                "insufficient token balance: have {from_balance}, need {amount}"
            ));
        }
        let to_balance = self.balance_of(to);
        let credited = to_balance
            .checked_add(amount)
            .ok_or_else(|| "token balance overflow".to_string())?;
        self.balances.insert(from, from_balance - amount);
        self.balances.insert(to, credited);
        Ok(())
    }
}

impl TokenCollaborator for InMemoryToken {
    fn transfer_from(&mut self, payer: AccountId, amount: Amount) -> Result<()> {
        let fail = |reason: String| TributeError::TransferFailed {
            op: TransferOp::Pull,
            account: payer,
            amount,
            reason,
        };
        let allowance = self.allowance(payer);
        if allowance < amount {
            return Err(fail(format!(
                "insufficient allowance: have {allowance}, need {amount}"
            )));
        }
        self.move_funds(payer, self.custody, amount).map_err(fail)?;
        self.allowances.insert(payer, allowance - amount);
        Ok(())
    }

    fn transfer(&mut self, to: AccountId, amount: Amount) -> Result<()> {
        self.move_funds(self.custody, to, amount)
            .map_err(|reason| TributeError::TransferFailed {
                op: TransferOp::Push,
                account: to,
                amount,
                reason,
            })
    }

    fn custody_balance(&self) -> Amount {
        self.balance_of(self.custody)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InMemoryToken, AccountId) {
        let token = InMemoryToken::new(AccountId::new());
        (token, AccountId::new())
    }

    #[test]
    fn transfer_from_requires_allowance() {
        let (mut token, user) = setup();
        token.mint(user, 100);
        let err = token.transfer_from(user, 10).unwrap_err();
        assert!(matches!(
            err,
            TributeError::TransferFailed {
                op: TransferOp::Pull,
                ..
            }
        ));
        assert_eq!(token.balance_of(user), 100);
        assert_eq!(token.custody_balance(), 0);
    }

    #[test]
    fn transfer_from_moves_into_custody() {
        let (mut token, user) = setup();
        token.fund(user, 100);
        token.transfer_from(user, 40).unwrap();
        assert_eq!(token.balance_of(user), 60);
        assert_eq!(token.custody_balance(), 40);
        assert_eq!(token.allowance(user), 60);
    }

    #[test]
    fn transfer_from_insufficient_balance_fails() {
        let (mut token, user) = setup();
        token.mint(user, 5);
        token.approve(user, 100);
        assert!(token.transfer_from(user, 10).is_err());
        assert_eq!(token.allowance(user), 100, "allowance untouched on failure");
    }

    #[test]
    fn transfer_pushes_out_of_custody() {
        let (mut token, user) = setup();
        token.fund(user, 100);
        token.transfer_from(user, 100).unwrap();
        let other = AccountId::new();
        token.transfer(other, 30).unwrap();
        assert_eq!(token.balance_of(other), 30);
        assert_eq!(token.custody_balance(), 70);
    }

    #[test]
    fn transfer_beyond_custody_fails() {
        let (mut token, user) = setup();
        let err = token.transfer(user, 1).unwrap_err();
        assert!(matches!(
            err,
            TributeError::TransferFailed {
                op: TransferOp::Push,
                ..
            }
        ));
    }

    #[test]
    fn custody_cannot_pull_from_itself() {
        let (mut token, _) = setup();
        let custody = token.custody_account();
        token.fund(custody, 5);
        let err = token.transfer_from(custody, 5).unwrap_err();
        assert!(matches!(
            err,
            TributeError::TransferFailed {
                op: TransferOp::Pull,
                ..
            }
        ));
        assert_eq!(token.custody_balance(), 5, "no tokens created");
        assert_eq!(token.allowance(custody), 5);
    }

    #[test]
    fn custody_cannot_push_to_itself() {
        let (mut token, user) = setup();
        token.fund(user, 10);
        token.transfer_from(user, 10).unwrap();
        let custody = token.custody_account();
        assert!(token.transfer(custody, 10).is_err());
        assert_eq!(token.custody_balance(), 10);
    }

    #[test]
    fn blocked_account_cannot_receive() {
        let (mut token, user) = setup();
        token.fund(user, 10);
        token.transfer_from(user, 10).unwrap();
        token.block(user);
        assert!(token.transfer(user, 10).is_err());
        assert_eq!(token.custody_balance(), 10);
        token.unblock(user);
        token.transfer(user, 10).unwrap();
        assert_eq!(token.balance_of(user), 10);
    }
}
