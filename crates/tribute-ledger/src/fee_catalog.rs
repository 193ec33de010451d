//! Fee catalog: what each recipient charges each payer.
//!
//! Entries are keyed by `(recipient, payer)`; a recipient's default fee sits
//! under `(recipient, AccountId::WILDCARD)`.
//!
//! Two friend checks consult the [`FriendRegistry`], deliberately keyed in
//! opposite roles:
//!
//! | Path        | Check                                              |
//! |-------------|----------------------------------------------------|
//! | `fee_for`   | `is_friend(registrant = recipient, candidate = payer)` |
//! | `set_fee`   | `is_friend(registrant = payer, candidate = recipient)` |
//!
//! The first exempts people the recipient has befriended. The second refuses
//! to price a payer who has befriended the recipient. They are independent
//! relations and are kept that way.

use std::collections::HashMap;

use tribute_types::{AccountId, Amount, Fee, Result, TributeError};

use crate::friend_registry::FriendRegistry;

#[derive(Debug, Default)]
pub struct FeeCatalog {
    entries: HashMap<(AccountId, AccountId), Fee>,
}

impl FeeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Overwrite the fee `recipient` charges `payer` (or the wildcard).
    ///
    /// # Errors
    /// - `InvalidFee` if the recipient is the wildcard or prices itself
    /// - `FeeTargetIsFriend` if `payer` has registered `recipient` as a friend
    pub fn set_fee(
        &mut self,
        friends: &FriendRegistry,
        recipient: AccountId,
        payer: AccountId,
        amount: Amount,
        permanent: bool,
    ) -> Result<()> {
        if recipient.is_wildcard() {
            return Err(TributeError::InvalidFee {
                reason: "wildcard account cannot set fees".into(),
            });
        }
        if payer == recipient {
            return Err(TributeError::InvalidFee {
                reason: format!("{recipient} cannot set a fee for itself"),
            });
        }
        if friends.is_friend(payer, recipient) {
            return Err(TributeError::FeeTargetIsFriend { recipient, payer });
        }

        let fee = Fee::new(amount, permanent);
        if fee == Fee::ZERO {
            self.entries.remove(&(recipient, payer));
        } else {
            self.entries.insert((recipient, payer), fee);
        }
        Ok(())
    }

    /// Effective fee `payer` must escrow to reach `recipient`.
    ///
    /// Friends of the recipient pay nothing. Otherwise a specific non-zero
    /// entry wins over the wildcard entry.
    #[must_use]
    pub fn fee_for(&self, friends: &FriendRegistry, recipient: AccountId, payer: AccountId) -> Fee {
        if friends.is_friend(recipient, payer) {
            return Fee::ZERO;
        }
        let specific = self.entry(recipient, payer);
        if specific.amount > 0 {
            return specific;
        }
        self.entry(recipient, AccountId::WILDCARD)
    }

    /// Reset the `(recipient, payer)` entry unless it is permanent.
    ///
    /// Returns `true` if an entry was actually cleared.
    pub fn clear(&mut self, recipient: AccountId, payer: AccountId) -> bool {
        match self.entries.get(&(recipient, payer)) {
            Some(fee) if !fee.permanent => {
                self.entries.remove(&(recipient, payer));
                true
            }
            _ => false,
        }
    }

    /// Raw catalog entry, without friend or wildcard resolution.
    #[must_use]
    pub fn entry(&self, recipient: AccountId, payer: AccountId) -> Fee {
        self.entries
            .get(&(recipient, payer))
            .copied()
            .unwrap_or(Fee::ZERO)
    }

    /// Number of stored (non-zero) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (FeeCatalog, FriendRegistry, AccountId, AccountId) {
        (
            FeeCatalog::new(),
            FriendRegistry::new(),
            AccountId::new(),
            AccountId::new(),
        )
    }

    #[test]
    fn unset_fee_is_zero() {
        let (cat, friends, r, q) = setup();
        assert_eq!(cat.fee_for(&friends, r, q), Fee::ZERO);
    }

    #[test]
    fn wildcard_applies_without_specific_entry() {
        let (mut cat, friends, r, q) = setup();
        cat.set_fee(&friends, r, AccountId::WILDCARD, 10, false).unwrap();
        assert_eq!(cat.fee_for(&friends, r, q), Fee::one_shot(10));
    }

    #[test]
    fn specific_entry_overrides_wildcard() {
        let (mut cat, friends, r, q) = setup();
        cat.set_fee(&friends, r, AccountId::WILDCARD, 10, false).unwrap();
        cat.set_fee(&friends, r, q, 3, true).unwrap();
        assert_eq!(cat.fee_for(&friends, r, q), Fee::permanent(3));
        // Other payers still see the wildcard.
        assert_eq!(cat.fee_for(&friends, r, AccountId::new()).amount, 10);
    }

    #[test]
    fn zero_specific_entry_falls_back_to_wildcard() {
        let (mut cat, friends, r, q) = setup();
        cat.set_fee(&friends, r, AccountId::WILDCARD, 10, false).unwrap();
        cat.set_fee(&friends, r, q, 0, false).unwrap();
        assert_eq!(cat.fee_for(&friends, r, q).amount, 10);
    }

    #[test]
    fn recipients_friend_pays_nothing() {
        let (mut cat, mut friends, r, q) = setup();
        cat.set_fee(&friends, r, AccountId::WILDCARD, 10, false).unwrap();
        cat.set_fee(&friends, r, q, 50, true).unwrap();
        friends.add_friend(r, q).unwrap();
        assert_eq!(cat.fee_for(&friends, r, q), Fee::ZERO);
        // The catalog entry itself is untouched.
        assert_eq!(cat.entry(r, q), Fee::permanent(50));
    }

    #[test]
    fn payers_own_friendship_does_not_exempt() {
        let (mut cat, mut friends, r, q) = setup();
        cat.set_fee(&friends, r, AccountId::WILDCARD, 10, false).unwrap();
        friends.add_friend(q, r).unwrap();
        assert_eq!(cat.fee_for(&friends, r, q).amount, 10);
    }

    #[test]
    fn set_fee_guard_checks_payer_registered_recipient() {
        let (mut cat, mut friends, r, q) = setup();
        friends.add_friend(q, r).unwrap();
        let err = cat.set_fee(&friends, r, q, 5, false).unwrap_err();
        assert!(matches!(err, TributeError::FeeTargetIsFriend { .. }));
        assert!(cat.is_empty());
    }

    #[test]
    fn set_fee_guard_ignores_recipients_own_friend() {
        let (mut cat, mut friends, r, q) = setup();
        friends.add_friend(r, q).unwrap();
        cat.set_fee(&friends, r, q, 5, false).unwrap();
        assert_eq!(cat.entry(r, q), Fee::one_shot(5));
        // ...but it has no effect while the friendship lasts.
        assert_eq!(cat.fee_for(&friends, r, q), Fee::ZERO);
    }

    #[test]
    fn malformed_fee_arguments_rejected() {
        let (mut cat, friends, r, _) = setup();
        assert!(matches!(
            cat.set_fee(&friends, r, r, 1, false).unwrap_err(),
            TributeError::InvalidFee { .. }
        ));
        assert!(matches!(
            cat.set_fee(&friends, AccountId::WILDCARD, r, 1, false)
                .unwrap_err(),
            TributeError::InvalidFee { .. }
        ));
    }

    #[test]
    fn clear_resets_non_permanent() {
        let (mut cat, friends, r, q) = setup();
        cat.set_fee(&friends, r, q, 7, false).unwrap();
        assert!(cat.clear(r, q));
        assert_eq!(cat.entry(r, q), Fee::ZERO);
    }

    #[test]
    fn clear_keeps_permanent() {
        let (mut cat, friends, r, q) = setup();
        cat.set_fee(&friends, r, q, 7, true).unwrap();
        assert!(!cat.clear(r, q));
        assert_eq!(cat.entry(r, q), Fee::permanent(7));
    }

    #[test]
    fn clear_does_not_touch_wildcard() {
        let (mut cat, friends, r, q) = setup();
        cat.set_fee(&friends, r, AccountId::WILDCARD, 10, false).unwrap();
        assert!(!cat.clear(r, q));
        assert_eq!(cat.entry(r, AccountId::WILDCARD), Fee::one_shot(10));
    }

    #[test]
    fn overwrite_replaces_entry() {
        let (mut cat, friends, r, q) = setup();
        cat.set_fee(&friends, r, q, 7, true).unwrap();
        cat.set_fee(&friends, r, q, 9, false).unwrap();
        assert_eq!(cat.entry(r, q), Fee::one_shot(9));
        assert_eq!(cat.len(), 1);
    }
}
