//! Custody conservation invariant checker.
//!
//! Mathematical invariant enforced after every gate operation:
//! ```text
//! custody == Σ(ledger balances) + Σ(escrowed fees)
//!         == Σ(deposits) − Σ(withdrawals) − Σ(payouts)
//! ```
//!
//! Requests, refunds, timeouts and cancellations only move value between a
//! ledger balance and an audience record, so they leave both sides unchanged.
//! Only deposits, withdrawals and approved-fee payouts cross the custody
//! boundary.

use tribute_types::{Amount, CustodyReport, Result, TributeError};

/// Running totals of every custody-boundary crossing.
#[derive(Debug, Default)]
pub struct CustodyConservation {
    deposits: Amount,
    withdrawals: Amount,
    payouts: Amount,
}

impl CustodyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            deposits: 0,
            withdrawals: 0,
            payouts: 0,
        }
    }

    pub fn record_deposit(&mut self, amount: Amount) {
        self.deposits = self.deposits.saturating_add(amount);
    }

    pub fn record_withdrawal(&mut self, amount: Amount) {
        self.withdrawals = self.withdrawals.saturating_add(amount);
    }

    /// A granted fee paid out to its recipient.
    pub fn record_payout(&mut self, amount: Amount) {
        self.payouts = self.payouts.saturating_add(amount);
    }

    /// What custody should hold: deposits − withdrawals − payouts.
    ///
    /// `None` if outflows exceed inflows, which is itself a violation.
    #[must_use]
    pub fn expected_custody(&self) -> Option<Amount> {
        self.deposits
            .checked_sub(self.withdrawals)
            .and_then(|v| v.checked_sub(self.payouts))
    }

    /// Verify one custody observation against the running totals.
    ///
    /// # Errors
    /// Returns [`TributeError::CustodyInvariantViolation`] if either
    /// equality fails.
    pub fn verify(&self, report: &CustodyReport) -> Result<()> {
        if !report.is_balanced() {
            return Err(TributeError::CustodyInvariantViolation {
                reason: format!(
                    "custody {} != ledger {} + escrow {}",
                    report.custody, report.ledger_total, report.escrowed_total
                ),
            });
        }
        let expected = self.expected_custody();
        if expected != Some(report.custody) {
            return Err(TributeError::CustodyInvariantViolation {
                reason: format!(
                    "custody {} != expected {expected:?} \
                     (deposits={}, withdrawals={}, payouts={})",
                    report.custody, self.deposits, self.withdrawals, self.payouts
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_deposits(&self) -> Amount {
        self.deposits
    }

    #[must_use]
    pub fn total_withdrawals(&self) -> Amount {
        self.withdrawals
    }

    #[must_use]
    pub fn total_payouts(&self) -> Amount {
        self.payouts
    }
}
