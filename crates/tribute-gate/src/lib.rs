//! # tribute-gate
//!
//! **Audience plane**: escrowed contact requests between accounts, resolved
//! exactly once by grant, deny, timeout, or cancellation.
//!
//! ## Architecture
//!
//! [`TributeGate`] composes the ledger structures from `tribute-ledger` with:
//! 1. An [`AudienceBook`] of live requests and denial markers
//! 2. A [`TokenCollaborator`] that moves value in and out of custody
//! 3. An [`EventLog`] of notifications for an external transport
//! 4. A [`CustodyConservation`] checker over every custody crossing
//!
//! ## Lifecycle
//!
//! ```text
//! Absent ──request──▶ Requested ──grant(approve)──▶ Granted
//!                         │  ├─────grant(deny)────▶ Denied (starts cooldown)
//!                         │  └─────time_out───────▶ TimedOut
//!                         └────────cancel─────────▶ Cancelled
//! ```
//!
//! Every terminal state deletes the record, so the pair returns to `Absent`.

pub mod audience_book;
pub mod custody_conservation;
pub mod event_log;
pub mod gate;
pub mod token;

pub use audience_book::AudienceBook;
pub use custody_conservation::CustodyConservation;
pub use event_log::EventLog;
pub use gate::TributeGate;
pub use token::{InMemoryToken, TokenCollaborator};
