//! Friend registry: per-recipient exemption sets.
//!
//! A registrant's friends never pay tribute to that registrant. Each
//! registrant owns a [`FriendSet`]: a dense member sequence plus a
//! member→slot index, giving O(1) insert, O(1) remove and O(1) lookup.
//!
//! Removal moves the last member into the freed slot, repoints that
//! member's index entry, then truncates:
//!
//! ```text
//!   remove(B)       members: [A, B, C, D]   slots: {A:0, B:1, C:2, D:3}
//!   D -> slot 1     members: [A, D, C, D]   slots: {A:0, D:1, C:2}
//!   truncate        members: [A, D, C]
//! ```

use std::collections::HashMap;

use tribute_types::{AccountId, Result, TributeError};

/// Unordered set with swap-remove and a reverse index.
#[derive(Debug, Clone, Default)]
pub struct FriendSet {
    members: Vec<AccountId>,
    slots: HashMap<AccountId, usize>,
}

impl FriendSet {
    /// Insert `candidate`. Returns `false` if it was already present.
    pub fn insert(&mut self, candidate: AccountId) -> bool {
        if self.slots.contains_key(&candidate) {
            return false;
        }
        self.slots.insert(candidate, self.members.len());
        self.members.push(candidate);
        true
    }

    /// Remove `candidate`. Returns `false` if it was not present.
    pub fn remove(&mut self, candidate: AccountId) -> bool {
        let Some(slot) = self.slots.remove(&candidate) else {
            return false;
        };
        let last = self.members.len() - 1;
        if slot != last {
            let moved = self.members[last];
            self.members[slot] = moved;
            self.slots.insert(moved, slot);
        }
        self.members.truncate(last);
        true
    }

    #[must_use]
    pub fn contains(&self, candidate: AccountId) -> bool {
        self.slots.contains_key(&candidate)
    }

    #[must_use]
    pub fn members(&self) -> &[AccountId] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// All friend sets, keyed by registrant.
#[derive(Debug, Default)]
pub struct FriendRegistry {
    sets: HashMap<AccountId, FriendSet>,
}

impl FriendRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sets: HashMap::new(),
        }
    }

    /// Add `candidate` to `registrant`'s friends. Idempotent.
    ///
    /// Returns `true` if the pair was newly inserted.
    ///
    /// # Errors
    /// `InvalidFriend` if `candidate` is the registrant or the wildcard.
    pub fn add_friend(&mut self, registrant: AccountId, candidate: AccountId) -> Result<bool> {
        validate_pair(registrant, candidate)?;
        Ok(self.sets.entry(registrant).or_default().insert(candidate))
    }

    /// Remove `candidate` from `registrant`'s friends.
    ///
    /// # Errors
    /// `FriendNotFound` if the pair is not registered.
    pub fn remove_friend(&mut self, registrant: AccountId, candidate: AccountId) -> Result<()> {
        let removed = self
            .sets
            .get_mut(&registrant)
            .is_some_and(|set| set.remove(candidate));
        if !removed {
            return Err(TributeError::FriendNotFound {
                registrant,
                candidate,
            });
        }
        self.prune(registrant);
        Ok(())
    }

    /// Add each candidate in order. All-or-nothing.
    ///
    /// Returns how many pairs were newly inserted.
    pub fn add_friends(&mut self, registrant: AccountId, candidates: &[AccountId]) -> Result<usize> {
        let mut staged = self.sets.get(&registrant).cloned().unwrap_or_default();
        let mut inserted = 0;
        for &candidate in candidates {
            validate_pair(registrant, candidate)?;
            if staged.insert(candidate) {
                inserted += 1;
            }
        }
        self.commit(registrant, staged);
        Ok(inserted)
    }

    /// Remove each candidate in order. All-or-nothing: a missing candidate
    /// (including one listed twice) leaves the set untouched.
    pub fn remove_friends(&mut self, registrant: AccountId, candidates: &[AccountId]) -> Result<()> {
        let mut staged = self.sets.get(&registrant).cloned().unwrap_or_default();
        for &candidate in candidates {
            if !staged.remove(candidate) {
                return Err(TributeError::FriendNotFound {
                    registrant,
                    candidate,
                });
            }
        }
        self.commit(registrant, staged);
        Ok(())
    }

    /// Has `registrant` added `candidate`?
    #[must_use]
    pub fn is_friend(&self, registrant: AccountId, candidate: AccountId) -> bool {
        self.sets
            .get(&registrant)
            .is_some_and(|set| set.contains(candidate))
    }

    /// `registrant`'s friends in backing-sequence order.
    #[must_use]
    pub fn friends_of(&self, registrant: AccountId) -> &[AccountId] {
        self.sets
            .get(&registrant)
            .map(FriendSet::members)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn friend_count(&self, registrant: AccountId) -> usize {
        self.sets.get(&registrant).map_or(0, FriendSet::len)
    }

    fn commit(&mut self, registrant: AccountId, staged: FriendSet) {
        if staged.is_empty() {
            self.sets.remove(&registrant);
        } else {
            self.sets.insert(registrant, staged);
        }
    }

    fn prune(&mut self, registrant: AccountId) {
        if self.sets.get(&registrant).is_some_and(FriendSet::is_empty) {
            self.sets.remove(&registrant);
        }
    }
}

fn validate_pair(registrant: AccountId, candidate: AccountId) -> Result<()> {
    if candidate.is_wildcard() || registrant.is_wildcard() {
        return Err(TributeError::InvalidFriend {
            reason: "wildcard account cannot take part in a friend relation".into(),
        });
    }
    if candidate == registrant {
        return Err(TributeError::InvalidFriend {
            reason: format!("{registrant} cannot befriend itself"),
        });
    }
    Ok(())
}
