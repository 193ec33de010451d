//! # tribute-ledger
//!
//! **Ledger state** for the Tribute gate: who holds what, who is exempt,
//! and what each recipient charges.
//!
//! ## Architecture
//!
//! Three pure in-memory components, owned and mutated only by the gate:
//! 1. **BalanceLedger**: per-account token balances held in custody
//! 2. **FriendRegistry**: per-registrant exemption sets (O(1) add/remove/lookup)
//! 3. **FeeCatalog**: per-(recipient, payer) and wildcard fee entries
//!
//! ## Fee Resolution
//!
//! ```text
//! fee_for(R, P) = 0                       if R befriended P
//!               = catalog[R, P]           if non-zero
//!               = catalog[R, WILDCARD]    otherwise
//! ```
//!
//! None of these components talk to the token collaborator; every
//! mutation here is local and infallible once its preconditions hold.

pub mod balance_ledger;
pub mod fee_catalog;
pub mod friend_registry;

pub use balance_ledger::BalanceLedger;
pub use fee_catalog::FeeCatalog;
pub use friend_registry::{FriendRegistry, FriendSet};
