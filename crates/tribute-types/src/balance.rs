//! Amount and custody accounting types.
//!
//! Every token held in pooled custody is either credited to some account's
//! ledger balance or escrowed inside a pending audience. [`CustodyReport`]
//! captures one observation of that split.

use serde::{Deserialize, Serialize};

/// Non-negative integer token amount, in the token's smallest unit.
pub type Amount = u128;

/// A point-in-time view of where custody funds sit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CustodyReport {
    /// Sum of all ledger balances.
    pub ledger_total: Amount,
    /// Sum of the fee snapshots of all live audience records.
    pub escrowed_total: Amount,
    /// Tokens the collaborator reports as held by the custody account.
    pub custody: Amount,
}

impl CustodyReport {
    /// Funds the gate accounts for (ledger + escrow), saturating on overflow.
    #[must_use]
    pub fn accounted(&self) -> Amount {
        self.ledger_total.saturating_add(self.escrowed_total)
    }

    /// Whether accounted funds exactly match custody.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.accounted() == self.custody
    }
}
