//! Error types for the Tribute gate.
//!
//! All errors use the `TR_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Balance ledger errors
//! - 2xx: Friend registry errors
//! - 3xx: Fee catalog errors
//! - 4xx: Audience errors
//! - 6xx: External token transfer errors
//! - 8xx: Invariant errors
//! - 9xx: General / internal errors
//!
//! Every variant belongs to one [`ErrorClass`]. Precondition violations and
//! transfer failures both abort the enclosing operation with no state change;
//! the class only tells the caller what to fix before resubmitting.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{AccountId, Amount};

/// Which side of the token collaborator a transfer was moving funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferOp {
    /// Pulling funds from a payer into custody.
    Pull,
    /// Pushing funds out of custody.
    Push,
}

impl std::fmt::Display for TransferOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pull => write!(f, "transfer_from"),
            Self::Push => write!(f, "transfer"),
        }
    }
}

/// Coarse taxonomy of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The caller's request was not admissible in the current state.
    PreconditionViolation,
    /// The token collaborator refused a transfer.
    ExternalTransferFailure,
    /// Configuration, serialization, or a broken internal invariant.
    Internal,
}

/// Central error enum for all Tribute operations.
#[derive(Debug, Error)]
pub enum TributeError {
    // =================================================================
    // Balance Errors (1xx)
    // =================================================================
    /// Deposits and withdrawals must move a positive amount.
    #[error("TR_ERR_100: Amount must be greater than zero")]
    ZeroAmount,

    /// Not enough ledger balance to perform the operation.
    #[error("TR_ERR_101: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// A credit would exceed the representable amount.
    #[error("TR_ERR_102: Balance overflow crediting {account}")]
    BalanceOverflow { account: AccountId },

    // =================================================================
    // Friend Errors (2xx)
    // =================================================================
    /// The candidate is not in the registrant's friend set.
    #[error("TR_ERR_200: {candidate} is not a friend of {registrant}")]
    FriendNotFound {
        registrant: AccountId,
        candidate: AccountId,
    },

    /// Malformed friend argument (self, wildcard).
    #[error("TR_ERR_201: Invalid friend: {reason}")]
    InvalidFriend { reason: String },

    // =================================================================
    // Fee Errors (3xx)
    // =================================================================
    /// Malformed fee argument.
    #[error("TR_ERR_300: Invalid fee: {reason}")]
    InvalidFee { reason: String },

    /// The payer has registered the recipient as a friend.
    #[error("TR_ERR_301: Cannot set a fee for {payer}: friend relation exists with {recipient}")]
    FeeTargetIsFriend {
        recipient: AccountId,
        payer: AccountId,
    },

    // =================================================================
    // Audience Errors (4xx)
    // =================================================================
    /// No live audience record for the pair.
    #[error("TR_ERR_400: No pending audience from {requester} to {recipient}")]
    AudienceNotFound {
        recipient: AccountId,
        requester: AccountId,
    },

    /// A live record already exists for the pair.
    #[error("TR_ERR_401: Audience from {requester} to {recipient} already pending")]
    AudienceAlreadyPending {
        recipient: AccountId,
        requester: AccountId,
    },

    /// The revealed secret does not open the stored challenge.
    #[error("TR_ERR_402: Challenge mismatch")]
    ChallengeMismatch,

    /// The requester was denied recently and must wait.
    #[error("TR_ERR_403: Denial cooldown active until {until}")]
    CooldownActive { until: DateTime<Utc> },

    /// The response window has not elapsed yet.
    #[error("TR_ERR_404: Audience cannot time out before {at}")]
    TimeoutNotElapsed { at: DateTime<Utc> },

    /// The minimum lock has not elapsed yet.
    #[error("TR_ERR_405: Audience request locked until {until}")]
    CancelLocked { until: DateTime<Utc> },

    /// Malformed audience argument (self, wildcard).
    #[error("TR_ERR_406: Invalid audience: {reason}")]
    InvalidAudience { reason: String },

    // =================================================================
    // Transfer Errors (6xx)
    // =================================================================
    /// The token collaborator rejected a transfer.
    #[error("TR_ERR_600: Token {op} of {amount} for {account} failed: {reason}")]
    TransferFailed {
        op: TransferOp,
        account: AccountId,
        amount: Amount,
        reason: String,
    },

    // =================================================================
    // Invariant Errors (8xx)
    // =================================================================
    /// Custody conservation invariant violated.
    #[error("TR_ERR_801: Custody invariant violation: {reason}")]
    CustodyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TR_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TR_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid window, malformed config, etc.).
    #[error("TR_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl TributeError {
    /// Map this error onto the failure taxonomy.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::TransferFailed { .. } => ErrorClass::ExternalTransferFailure,
            Self::CustodyInvariantViolation { .. }
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Configuration(_) => ErrorClass::Internal,
            _ => ErrorClass::PreconditionViolation,
        }
    }

    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.class() == ErrorClass::PreconditionViolation
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TributeError>;

impl From<serde_json::Error> for TributeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
