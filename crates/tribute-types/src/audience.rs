//! # Audience: an escrowed contact request
//!
//! An `Audience` record exists while a requester's tribute sits in escrow
//! waiting for the recipient to answer.
//!
//! ## State Machine
//!
//! ```text
//!                  request            grant(approve)   ┌─────────┐
//!   ┌────────┐ ──────────────▶ ┌───────────┐ ─────────▶│ GRANTED │
//!   │ ABSENT │                 │ REQUESTED │           └─────────┘
//!   └────────┘ ◀────────────── └─────┬─────┘ grant(!approve) ┌────────┐
//!        record deleted on any       ├──────────────────────▶│ DENIED │
//!        terminal transition         │ time_out              └────────┘
//!                                    ├──────────────▶ TIMED_OUT
//!                                    │ cancel
//!                                    └──────────────▶ CANCELLED
//! ```
//!
//! Terminal states are never stored: resolving a request deletes the record,
//! so the key returns to ABSENT and a new request may be opened later.
//!
//! ## Challenge
//!
//! The requester commits to `SHA-256(domain || recipient || requester ||
//! secret)`. Only a party that knows the pre-shared secret can resolve the
//! request as the recipient.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, Amount, Fee, constants};

/// Lifecycle state of an (recipient, requester) audience slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudienceState {
    /// No live record for the pair.
    Absent,
    /// Tribute escrowed, awaiting resolution.
    Requested,
    /// Recipient approved.
    Granted,
    /// Recipient refused; starts the denial cooldown.
    Denied,
    /// Nobody answered within the response window.
    TimedOut,
    /// The requester withdrew after the minimum lock.
    Cancelled,
}

impl AudienceState {
    /// Can a slot in this state move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Absent, Self::Requested)
                | (
                    Self::Requested,
                    Self::Granted | Self::Denied | Self::TimedOut | Self::Cancelled
                )
        )
    }
}

impl std::fmt::Display for AudienceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "ABSENT"),
            Self::Requested => write!(f, "REQUESTED"),
            Self::Granted => write!(f, "GRANTED"),
            Self::Denied => write!(f, "DENIED"),
            Self::TimedOut => write!(f, "TIMED_OUT"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChallengeHash
// ---------------------------------------------------------------------------

/// Commitment to the secret the recipient must reveal to resolve a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeHash(pub [u8; 32]);

impl ChallengeHash {
    /// Commit to `secret` for the ordered (recipient, requester) pair.
    ///
    /// Binding both parties means a secret leaked for one pair cannot
    /// resolve another pair's request.
    #[must_use]
    pub fn compute(recipient: AccountId, requester: AccountId, secret: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(constants::CHALLENGE_DOMAIN);
        hasher.update(recipient.as_bytes());
        hasher.update(requester.as_bytes());
        hasher.update(secret);
        Self(hasher.finalize().into())
    }

    /// Check a revealed secret against this commitment.
    #[must_use]
    pub fn matches(&self, recipient: AccountId, requester: AccountId, secret: &[u8]) -> bool {
        Self::compute(recipient, requester, secret) == *self
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ChallengeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Audience
// ---------------------------------------------------------------------------

/// A live, escrowed contact request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    pub recipient: AccountId,
    pub requester: AccountId,
    /// Gate operation sequence at creation (ordering marker).
    pub created_at_seq: u64,
    /// Wall time at creation; all deadlines are measured from here.
    pub created_at: DateTime<Utc>,
    /// Fee snapshot taken at request time. Never recomputed.
    pub fee: Fee,
    pub challenge: ChallengeHash,
}

impl Audience {
    /// Amount held in escrow for this request.
    #[must_use]
    pub fn escrowed(&self) -> Amount {
        self.fee.amount
    }

    /// Earliest time `window` has elapsed since creation, or `None` if that
    /// lies beyond the representable range.
    #[must_use]
    pub fn deadline(&self, window: TimeDelta) -> Option<DateTime<Utc>> {
        self.created_at.checked_add_signed(window)
    }

    /// Whether `window` has fully elapsed at `now`.
    #[must_use]
    pub fn has_elapsed(&self, window: TimeDelta, now: DateTime<Utc>) -> bool {
        self.deadline(window).is_some_and(|at| now >= at)
    }
}

/// Dummy audience for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Audience {
    /// Create an audience record for unit tests.
    pub fn dummy(recipient: AccountId, requester: AccountId, fee: Fee) -> Self {
        Self {
            recipient,
            requester,
            created_at_seq: 0,
            created_at: Utc::now(),
            fee,
            challenge: ChallengeHash::compute(recipient, requester, b"dummy"),
        }
    }
}
