//! Account identifiers used throughout Tribute.
//!
//! Fresh accounts use UUIDv7 for time-ordered lexicographic sorting. The nil
//! UUID is reserved as the wildcard-payer sentinel of the fee catalog.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a party on the shared ledger (requester, recipient, or both).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Sentinel payer meaning "any payer without a specific catalog entry".
    ///
    /// Never a valid caller, registrant, or friend candidate.
    pub const WILDCARD: Self = Self(Uuid::nil());

    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        *self == Self::WILDCARD
    }

    /// First four bytes in hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.as_bytes()[..4])
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            write!(f, "acct:*")
        } else {
            write!(f, "acct:{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_uniqueness() {
        let a = AccountId::new();
        let b = AccountId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn account_id_ordering() {
        let a = AccountId::new();
        let b = AccountId::new();
        assert!(a < b);
    }

    #[test]
    fn fresh_ids_are_never_wildcard() {
        assert!(!AccountId::new().is_wildcard());
        assert!(AccountId::WILDCARD.is_wildcard());
        assert_eq!(AccountId::from_bytes([0u8; 16]), AccountId::WILDCARD);
    }

    #[test]
    fn display_marks_wildcard() {
        assert_eq!(AccountId::WILDCARD.to_string(), "acct:*");
        let id = AccountId::new();
        assert!(id.to_string().starts_with("acct:"));
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn serde_roundtrip() {
        let id = AccountId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
