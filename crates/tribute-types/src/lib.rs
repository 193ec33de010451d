//! # tribute-types
//!
//! Shared types, errors, and configuration for the **Tribute** contact gate.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`] (with the [`AccountId::WILDCARD`] payer sentinel)
//! - **Amounts**: [`Amount`], [`CustodyReport`]
//! - **Fee model**: [`Fee`]
//! - **Audience model**: [`Audience`], [`AudienceState`], [`ChallengeHash`]
//! - **Notifications**: [`AudienceEvent`], [`EventKind`]
//! - **Configuration**: [`GateConfig`]
//! - **Time**: [`TimeSource`], [`SystemTimeSource`]
//! - **Errors**: [`TributeError`] with `TR_ERR_` prefix codes
//! - **Constants**: protocol windows and defaults

pub mod audience;
pub mod balance;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod fee;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use tribute_types::{AccountId, Audience, Fee, TributeError, ...};

pub use audience::*;
pub use balance::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use fee::*;
pub use ids::*;

// Constants are accessed via `tribute_types::constants::FOO`
// (not re-exported to avoid name collisions).
