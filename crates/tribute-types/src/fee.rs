//! Tribute fee entries.

use serde::{Deserialize, Serialize};

use crate::Amount;

/// A recipient's fee for one payer (or for the wildcard payer).
///
/// Non-permanent entries are reset once an audience that consumed them is
/// resolved by the recipient; permanent entries survive resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Amount,
    pub permanent: bool,
}

impl Fee {
    /// The exempt / unset fee.
    pub const ZERO: Self = Self {
        amount: 0,
        permanent: false,
    };

    #[must_use]
    pub fn new(amount: Amount, permanent: bool) -> Self {
        Self { amount, permanent }
    }

    /// A fee that is cleared after the audience it funded is resolved.
    #[must_use]
    pub fn one_shot(amount: Amount) -> Self {
        Self::new(amount, false)
    }

    /// A fee that persists across resolutions.
    #[must_use]
    pub fn permanent(amount: Amount) -> Self {
        Self::new(amount, true)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl std::fmt::Display for Fee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.permanent {
            write!(f, "{} (permanent)", self.amount)
        } else {
            write!(f, "{}", self.amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fee_is_default() {
        assert_eq!(Fee::default(), Fee::ZERO);
        assert!(Fee::ZERO.is_zero());
        assert!(!Fee::ZERO.permanent);
    }

    #[test]
    fn constructors_set_permanence() {
        assert!(!Fee::one_shot(5).permanent);
        assert!(Fee::permanent(5).permanent);
        assert_eq!(Fee::permanent(5).amount, 5);
    }

    #[test]
    fn display_marks_permanent() {
        assert_eq!(Fee::one_shot(10).to_string(), "10");
        assert_eq!(Fee::permanent(10).to_string(), "10 (permanent)");
    }
}
