//! Notifications emitted by the gate.
//!
//! Every successful audience transition appends one [`AudienceEvent`].
//! Events are consumed by external transports; the gate makes no delivery
//! guarantee and emits nothing for aborted operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, AudienceState};

/// What happened to an audience request.
///
/// `from` is always the requester and `to` the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Requested { from: AccountId, to: AccountId },
    Cancelled { from: AccountId, to: AccountId },
    TimedOut { from: AccountId, to: AccountId },
    Granted {
        from: AccountId,
        to: AccountId,
        approve: bool,
    },
}

impl EventKind {
    /// The requester side of the event.
    #[must_use]
    pub fn requester(&self) -> AccountId {
        match *self {
            Self::Requested { from, .. }
            | Self::Cancelled { from, .. }
            | Self::TimedOut { from, .. }
            | Self::Granted { from, .. } => from,
        }
    }

    /// The recipient side of the event.
    #[must_use]
    pub fn recipient(&self) -> AccountId {
        match *self {
            Self::Requested { to, .. }
            | Self::Cancelled { to, .. }
            | Self::TimedOut { to, .. }
            | Self::Granted { to, .. } => to,
        }
    }

    /// The audience state this event moved the pair into.
    #[must_use]
    pub fn state(&self) -> AudienceState {
        match self {
            Self::Requested { .. } => AudienceState::Requested,
            Self::Cancelled { .. } => AudienceState::Cancelled,
            Self::TimedOut { .. } => AudienceState::TimedOut,
            Self::Granted { approve: true, .. } => AudienceState::Granted,
            Self::Granted { approve: false, .. } => AudienceState::Denied,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requested { .. } => write!(f, "REQUESTED"),
            Self::Cancelled { .. } => write!(f, "CANCELLED"),
            Self::TimedOut { .. } => write!(f, "TIMED_OUT"),
            Self::Granted { approve, .. } => write!(f, "GRANTED(approve={approve})"),
        }
    }
}

/// A sequenced, timestamped notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceEvent {
    /// Gate operation sequence of the transition that produced this event.
    pub seq: u64,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}
