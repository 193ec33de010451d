//! Audience book: live escrowed requests and denial markers.
//!
//! At most one live [`Audience`] exists per `(recipient, requester)` pair.
//! Resolving a request removes it; a second resolution attempt for the same
//! pair therefore finds nothing and fails, which is what makes resolution
//! exactly-once.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tribute_types::{AccountId, Amount, Audience, AudienceState, Result, TributeError};

/// Live audience records keyed by `(recipient, requester)`.
#[derive(Debug, Default)]
pub struct AudienceBook {
    live: HashMap<(AccountId, AccountId), Audience>,
    /// Time of the most recent denial per pair.
    last_denied: HashMap<(AccountId, AccountId), DateTime<Utc>>,
}

impl AudienceBook {
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: HashMap::new(),
            last_denied: HashMap::new(),
        }
    }

    /// Store a new live record.
    ///
    /// # Errors
    /// Returns `AudienceAlreadyPending` if the pair already has one.
    pub fn open(&mut self, audience: Audience) -> Result<()> {
        let key = (audience.recipient, audience.requester);
        if self.live.contains_key(&key) {
            return Err(TributeError::AudienceAlreadyPending {
                recipient: key.0,
                requester: key.1,
            });
        }
        self.live.insert(key, audience);
        Ok(())
    }

    /// Remove and return the live record for the pair.
    ///
    /// # Errors
    /// Returns `AudienceNotFound` if there is none.
    pub fn close(&mut self, recipient: AccountId, requester: AccountId) -> Result<Audience> {
        self.live
            .remove(&(recipient, requester))
            .ok_or(TributeError::AudienceNotFound {
                recipient,
                requester,
            })
    }

    /// Look up the live record for the pair.
    ///
    /// # Errors
    /// Returns `AudienceNotFound` if there is none.
    pub fn require(&self, recipient: AccountId, requester: AccountId) -> Result<&Audience> {
        self.get(recipient, requester)
            .ok_or(TributeError::AudienceNotFound {
                recipient,
                requester,
            })
    }

    #[must_use]
    pub fn get(&self, recipient: AccountId, requester: AccountId) -> Option<&Audience> {
        self.live.get(&(recipient, requester))
    }

    /// Lifecycle state of the pair's slot. Resolved records are deleted, so
    /// a slot is either `Requested` or `Absent`.
    #[must_use]
    pub fn state_of(&self, recipient: AccountId, requester: AccountId) -> AudienceState {
        if self.contains(recipient, requester) {
            AudienceState::Requested
        } else {
            AudienceState::Absent
        }
    }

    #[must_use]
    pub fn contains(&self, recipient: AccountId, requester: AccountId) -> bool {
        self.live.contains_key(&(recipient, requester))
    }

    /// Remember that `recipient` denied `requester` at `at`.
    pub fn record_denial(&mut self, recipient: AccountId, requester: AccountId, at: DateTime<Utc>) {
        self.last_denied.insert((recipient, requester), at);
    }

    #[must_use]
    pub fn denied_at(&self, recipient: AccountId, requester: AccountId) -> Option<DateTime<Utc>> {
        self.last_denied.get(&(recipient, requester)).copied()
    }

    /// All live requests addressed to `recipient`, oldest first.
    #[must_use]
    pub fn pending_for(&self, recipient: AccountId) -> Vec<&Audience> {
        let mut inbox: Vec<&Audience> = self
            .live
            .values()
            .filter(|a| a.recipient == recipient)
            .collect();
        inbox.sort_by_key(|a| a.created_at_seq);
        inbox
    }

    /// Sum of all escrowed amounts, saturating on overflow.
    #[must_use]
    pub fn escrowed_total(&self) -> Amount {
        self.live
            .values()
            .fold(0, |acc: Amount, a| acc.saturating_add(a.escrowed()))
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
