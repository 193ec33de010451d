//! The Tribute gate: balance ledger + friend registry + fee catalog +
//! audience state machine behind one sequenced operation surface.
//!
//! Every public mutating operation:
//! 1. Checks all preconditions against current state and the time source
//! 2. Performs the (at most one) token collaborator call
//! 3. Commits ledger / catalog / record mutations that can no longer fail
//! 4. Appends its notification and advances the operation sequence
//!
//! A failure in step 1 or 2 returns before anything is committed, so an
//! aborted operation leaves no observable trace.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};
use tribute_ledger::{BalanceLedger, FeeCatalog, FriendRegistry};
use tribute_types::{
    AccountId, Amount, Audience, AudienceEvent, AudienceState, ChallengeHash, CustodyReport,
    EventKind, Fee, GateConfig, Result, SystemTimeSource, TimeSource, TributeError,
};

use crate::audience_book::AudienceBook;
use crate::custody_conservation::CustodyConservation;
use crate::event_log::EventLog;
use crate::token::TokenCollaborator;

/// Economic anti-spam gate for contact requests.
///
/// Owns all ledger state exclusively. The caller of each operation is passed
/// explicitly; the surrounding settlement layer is responsible for
/// authenticating it and for sequencing operations.
pub struct TributeGate<T: TokenCollaborator, C: TimeSource = SystemTimeSource> {
    config: GateConfig,
    token: T,
    clock: C,
    ledger: BalanceLedger,
    friends: FriendRegistry,
    fees: FeeCatalog,
    audiences: AudienceBook,
    events: EventLog,
    custody: CustodyConservation,
    /// Number of committed mutating operations.
    seq: u64,
}

impl<T: TokenCollaborator> TributeGate<T> {
    /// Gate with default windows on the wall clock.
    #[must_use]
    pub fn with_system_clock(token: T) -> Self {
        Self::new(token, SystemTimeSource)
    }
}

impl<T: TokenCollaborator, C: TimeSource> TributeGate<T, C> {
    /// Gate with default windows.
    #[must_use]
    pub fn new(token: T, clock: C) -> Self {
        Self {
            config: GateConfig::default(),
            token,
            clock,
            ledger: BalanceLedger::new(),
            friends: FriendRegistry::new(),
            fees: FeeCatalog::new(),
            audiences: AudienceBook::new(),
            events: EventLog::new(),
            custody: CustodyConservation::new(),
            seq: 0,
        }
    }

    /// Gate with custom windows.
    ///
    /// # Errors
    /// Returns `Configuration` if the config fails validation.
    pub fn with_config(config: GateConfig, token: T, clock: C) -> Result<Self> {
        config.validate()?;
        let mut gate = Self::new(token, clock);
        gate.config = config;
        Ok(gate)
    }

    // =================================================================
    // Friend registry
    // =================================================================

    /// Exempt each candidate from `caller`'s tribute. Idempotent per element,
    /// atomic per batch. Returns how many pairs were new.
    pub fn add_friends(&mut self, caller: AccountId, candidates: &[AccountId]) -> Result<usize> {
        let inserted = self.friends.add_friends(caller, candidates)?;
        self.next_seq();
        debug!(registrant = %caller, requested = candidates.len(), inserted, "friends added");
        Ok(inserted)
    }

    /// Revoke each candidate's exemption. Fails (changing nothing) if any
    /// candidate is not currently a friend.
    pub fn remove_friends(&mut self, caller: AccountId, candidates: &[AccountId]) -> Result<()> {
        self.friends.remove_friends(caller, candidates)?;
        self.next_seq();
        debug!(registrant = %caller, removed = candidates.len(), "friends removed");
        Ok(())
    }

    /// Has `source` registered `candidate` as a friend?
    #[must_use]
    pub fn are_friends(&self, source: AccountId, candidate: AccountId) -> bool {
        self.friends.is_friend(source, candidate)
    }

    #[must_use]
    pub fn friends_of(&self, registrant: AccountId) -> &[AccountId] {
        self.friends.friends_of(registrant)
    }

    // =================================================================
    // Fee catalog
    // =================================================================

    /// Set what `caller` charges `payer` (or [`AccountId::WILDCARD`]).
    pub fn set_required_tribute(
        &mut self,
        caller: AccountId,
        payer: AccountId,
        amount: Amount,
        permanent: bool,
    ) -> Result<()> {
        self.fees
            .set_fee(&self.friends, caller, payer, amount, permanent)
            .inspect_err(|e| debug!(recipient = %caller, payer = %payer, error = %e, "fee rejected"))?;
        self.next_seq();
        debug!(recipient = %caller, payer = %payer, amount, permanent, "fee set");
        Ok(())
    }

    /// Fee `caller` would escrow to request an audience with `recipient`.
    #[must_use]
    pub fn required_fee(&self, caller: AccountId, recipient: AccountId) -> Amount {
        self.effective_fee(recipient, caller).amount
    }

    /// Raw catalog entry, without friend or wildcard resolution.
    #[must_use]
    pub fn fee_entry(&self, recipient: AccountId, payer: AccountId) -> Fee {
        self.fees.entry(recipient, payer)
    }

    // =================================================================
    // Balance ledger
    // =================================================================

    /// Pull `amount` from `caller` into custody and credit their balance.
    pub fn deposit(&mut self, caller: AccountId, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(TributeError::ZeroAmount);
        }
        if !self.ledger.can_credit(caller, amount) {
            return Err(TributeError::BalanceOverflow { account: caller });
        }

        self.token
            .transfer_from(caller, amount)
            .inspect_err(|e| warn!(account = %caller, amount, error = %e, "deposit pull rejected"))?;
        self.ledger.credit(caller, amount)?;
        self.custody.record_deposit(amount);
        self.next_seq();

        info!(account = %caller, amount, balance = self.ledger.balance_of(caller), "deposit");
        Ok(())
    }

    /// `caller`'s ledger balance.
    #[must_use]
    pub fn balance(&self, caller: AccountId) -> Amount {
        self.ledger.balance_of(caller)
    }

    /// Debit `caller`'s balance and push `amount` out of custody to them.
    pub fn withdraw(&mut self, caller: AccountId, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(TributeError::ZeroAmount);
        }
        let available = self.ledger.balance_of(caller);
        if available < amount {
            return Err(TributeError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        self.token
            .transfer(caller, amount)
            .inspect_err(|e| warn!(account = %caller, amount, error = %e, "withdraw push rejected"))?;
        self.ledger.debit(caller, amount)?;
        self.custody.record_withdrawal(amount);
        self.next_seq();

        info!(account = %caller, amount, balance = self.ledger.balance_of(caller), "withdraw");
        Ok(())
    }

    // =================================================================
    // Audience state machine
    // =================================================================

    /// Escrow the current fee and open an audience request from `caller`
    /// to `recipient`.
    ///
    /// # Errors
    /// - `InvalidAudience` for self-requests or the wildcard
    /// - `InsufficientBalance` if the fee exceeds `caller`'s balance
    /// - `AudienceAlreadyPending` if the pair already has a live request
    /// - `CooldownActive` if `recipient` denied `caller` too recently
    pub fn request_audience(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
        challenge: ChallengeHash,
    ) -> Result<()> {
        if recipient.is_wildcard() || caller.is_wildcard() {
            return Err(TributeError::InvalidAudience {
                reason: "wildcard account cannot take part in an audience".into(),
            });
        }
        if recipient == caller {
            return Err(TributeError::InvalidAudience {
                reason: format!("{caller} cannot request an audience with itself"),
            });
        }

        let fee = self.effective_fee(recipient, caller);
        let available = self.ledger.balance_of(caller);
        if fee.amount > available {
            return Err(TributeError::InsufficientBalance {
                needed: fee.amount,
                available,
            });
        }
        self.ensure_transition(recipient, caller, AudienceState::Requested)?;
        let now = self.clock.now();
        if let Some(until) = self.cooldown_until(recipient, caller) {
            if now < until {
                debug!(recipient = %recipient, requester = %caller, %until, "request blocked by cooldown");
                return Err(TributeError::CooldownActive { until });
            }
        }

        let seq = self.next_seq();
        self.ledger.debit(caller, fee.amount)?;
        self.audiences.open(Audience {
            recipient,
            requester: caller,
            created_at_seq: seq,
            created_at: now,
            fee,
            challenge,
        })?;
        self.emit(
            seq,
            now,
            EventKind::Requested {
                from: caller,
                to: recipient,
            },
        );

        info!(
            recipient = %recipient,
            requester = %caller,
            escrowed = fee.amount,
            challenge = %challenge,
            "audience requested"
        );
        Ok(())
    }

    /// Resolve `requester`'s pending request to `caller`.
    ///
    /// `approve && !waive` pays the escrowed fee to `caller`; every other
    /// combination refunds the requester. A denial starts the cooldown.
    /// There is no deadline: a request past its timeout can still be
    /// granted until someone times it out.
    ///
    /// # Errors
    /// - `AudienceNotFound` if no request is pending
    /// - `ChallengeMismatch` if `secret` does not open the challenge
    /// - `TransferFailed` if the payout is rejected (nothing changes)
    pub fn grant_audience(
        &mut self,
        caller: AccountId,
        requester: AccountId,
        approve: bool,
        waive: bool,
        secret: &[u8],
    ) -> Result<()> {
        let target = if approve {
            AudienceState::Granted
        } else {
            AudienceState::Denied
        };
        self.ensure_transition(caller, requester, target)?;
        let audience = self.audiences.require(caller, requester)?;
        if !audience.challenge.matches(caller, requester, secret) {
            debug!(recipient = %caller, requester = %requester, "challenge mismatch");
            return Err(TributeError::ChallengeMismatch);
        }
        let escrowed = audience.escrowed();
        let pay_out = approve && !waive;

        if pay_out {
            if escrowed > 0 {
                self.token.transfer(caller, escrowed).inspect_err(|e| {
                    warn!(recipient = %caller, requester = %requester, amount = escrowed, error = %e, "tribute payout rejected");
                })?;
            }
            self.custody.record_payout(escrowed);
        } else {
            self.ledger.credit(requester, escrowed)?;
        }

        let now = self.clock.now();
        let seq = self.next_seq();
        self.audiences.close(caller, requester)?;
        if !approve {
            self.audiences.record_denial(caller, requester, now);
        }
        let cleared = self.fees.clear(caller, requester);
        self.emit(
            seq,
            now,
            EventKind::Granted {
                from: requester,
                to: caller,
                approve,
            },
        );

        info!(
            recipient = %caller,
            requester = %requester,
            state = %target,
            waive,
            amount = escrowed,
            paid_out = pay_out,
            fee_cleared = cleared,
            "audience resolved"
        );
        Ok(())
    }

    /// Refund a request nobody answered within the response window.
    /// Callable by anyone.
    ///
    /// # Errors
    /// - `AudienceNotFound` if no request is pending
    /// - `TimeoutNotElapsed` if the window is still open
    pub fn time_out(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
        requester: AccountId,
    ) -> Result<()> {
        let now = self.clock.now();
        let window = self.config.response_timeout();
        self.ensure_transition(recipient, requester, AudienceState::TimedOut)?;
        let audience = self.audiences.require(recipient, requester)?;
        if !audience.has_elapsed(window, now) {
            return Err(TributeError::TimeoutNotElapsed {
                at: deadline_or_max(audience, window),
            });
        }

        let refunded = self.refund(recipient, requester)?;
        let seq = self.next_seq();
        self.emit(
            seq,
            now,
            EventKind::TimedOut {
                from: requester,
                to: recipient,
            },
        );

        info!(
            caller = %caller,
            recipient = %recipient,
            requester = %requester,
            refunded,
            state = %AudienceState::TimedOut,
            "audience resolved"
        );
        Ok(())
    }

    /// Retract `caller`'s own request to `recipient` once the minimum lock
    /// has elapsed.
    ///
    /// # Errors
    /// - `AudienceNotFound` if no request is pending
    /// - `CancelLocked` if the request is too young
    pub fn cancel_audience_request(&mut self, caller: AccountId, recipient: AccountId) -> Result<()> {
        let now = self.clock.now();
        let window = self.config.min_cancel_lock();
        self.ensure_transition(recipient, caller, AudienceState::Cancelled)?;
        let audience = self.audiences.require(recipient, caller)?;
        if !audience.has_elapsed(window, now) {
            return Err(TributeError::CancelLocked {
                until: deadline_or_max(audience, window),
            });
        }

        let refunded = self.refund(recipient, caller)?;
        let seq = self.next_seq();
        self.emit(
            seq,
            now,
            EventKind::Cancelled {
                from: caller,
                to: recipient,
            },
        );

        info!(
            recipient = %recipient,
            requester = %caller,
            refunded,
            state = %AudienceState::Cancelled,
            "audience resolved"
        );
        Ok(())
    }

    #[must_use]
    pub fn has_pending_audience(&self, recipient: AccountId, requester: AccountId) -> bool {
        self.audiences.contains(recipient, requester)
    }

    /// Can `caller` currently afford the fee to reach `recipient`?
    #[must_use]
    pub fn has_enough_funds_to_talk(&self, caller: AccountId, recipient: AccountId) -> bool {
        self.effective_fee(recipient, caller).amount <= self.ledger.balance_of(caller)
    }

    #[must_use]
    pub fn audience(&self, recipient: AccountId, requester: AccountId) -> Option<&Audience> {
        self.audiences.get(recipient, requester)
    }

    /// `recipient`'s inbox of live requests, oldest first.
    #[must_use]
    pub fn pending_for_recipient(&self, recipient: AccountId) -> Vec<&Audience> {
        self.audiences.pending_for(recipient)
    }

    /// When `requester` may next ask `recipient`, if a denial is on record.
    ///
    /// A cooldown end beyond the representable range is reported as
    /// `DateTime::<Utc>::MAX_UTC`.
    #[must_use]
    pub fn cooldown_until(&self, recipient: AccountId, requester: AccountId) -> Option<DateTime<Utc>> {
        self.audiences.denied_at(recipient, requester).map(|at| {
            at.checked_add_signed(self.config.denial_cooldown())
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }

    // =================================================================
    // Notifications, accounting, accessors
    // =================================================================

    #[must_use]
    pub fn events(&self) -> &[AudienceEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<AudienceEvent> {
        self.events.drain()
    }

    #[must_use]
    pub fn escrowed_total(&self) -> Amount {
        self.audiences.escrowed_total()
    }

    /// Snapshot of where custody funds sit.
    #[must_use]
    pub fn custody_report(&self) -> CustodyReport {
        CustodyReport {
            ledger_total: self.ledger.total(),
            escrowed_total: self.audiences.escrowed_total(),
            custody: self.token.custody_balance(),
        }
    }

    /// Check `custody == Σ balances + Σ escrow == deposits − withdrawals − payouts`.
    pub fn verify_conservation(&self) -> Result<()> {
        self.custody.verify(&self.custody_report())
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Operation sequence of the last committed mutation.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Mutable access to the collaborator, for funding and fault injection.
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    // =================================================================
    // Internals
    // =================================================================

    fn effective_fee(&self, recipient: AccountId, payer: AccountId) -> Fee {
        self.fees.fee_for(&self.friends, recipient, payer)
    }

    /// Check the pair's lifecycle table allows moving to `target`.
    fn ensure_transition(
        &self,
        recipient: AccountId,
        requester: AccountId,
        target: AudienceState,
    ) -> Result<()> {
        let current = self.audiences.state_of(recipient, requester);
        if current.can_transition_to(target) {
            return Ok(());
        }
        debug!(recipient = %recipient, requester = %requester, %current, %target, "transition refused");
        Err(match current {
            AudienceState::Absent => TributeError::AudienceNotFound {
                recipient,
                requester,
            },
            _ => TributeError::AudienceAlreadyPending {
                recipient,
                requester,
            },
        })
    }

    /// Credit the escrow back to the requester, then delete the record.
    fn refund(&mut self, recipient: AccountId, requester: AccountId) -> Result<Amount> {
        let escrowed = self.audiences.require(recipient, requester)?.escrowed();
        self.ledger.credit(requester, escrowed)?;
        self.audiences.close(recipient, requester)?;
        Ok(escrowed)
    }

    fn emit(&mut self, seq: u64, at: DateTime<Utc>, kind: EventKind) {
        self.events.push(AudienceEvent { seq, at, kind });
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

fn deadline_or_max(audience: &Audience, window: TimeDelta) -> DateTime<Utc> {
    audience
        .deadline(window)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
