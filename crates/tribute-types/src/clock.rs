//! Time source abstraction.
//!
//! Every time-gated transition (timeout, cooldown, cancellation lock) is a
//! predicate evaluated against [`TimeSource::now`] at call time. There are
//! no timers. Implementations must never go backwards.

use chrono::{DateTime, Utc};

/// Supplies the current time to the gate.
pub trait TimeSource {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub use manual::{ManualClock, random_secret};

#[cfg(any(test, feature = "test-helpers"))]
mod manual {
    use std::sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    };

    use chrono::{DateTime, TimeDelta, Utc};

    use super::TimeSource;

    /// Shared, manually advanced clock for tests and simulations.
    ///
    /// Clones observe the same instant, so a test can keep one handle while
    /// the gate owns another.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now_ms: Arc<AtomicI64>,
    }

    impl ManualClock {
        /// Start at `start`.
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now_ms: Arc::new(AtomicI64::new(start.timestamp_millis())),
            }
        }

        /// Start at a fixed, arbitrary instant (2024-01-01T00:00:00Z).
        pub fn at_epoch() -> Self {
            Self::new(DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default())
        }

        /// Move time forward. Negative deltas are ignored.
        pub fn advance(&self, delta: TimeDelta) {
            let ms = delta.num_milliseconds().max(0);
            self.now_ms.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl TimeSource for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp_millis(self.now_ms.load(Ordering::SeqCst)).unwrap_or_default()
        }
    }

    /// Fresh 32-byte challenge secret.
    pub fn random_secret() -> [u8; 32] {
        rand::random()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn system_clock_tracks_wall_time() {
        let before = Utc::now();
        let now = SystemTimeSource.now();
        assert!(now >= before);
    }

    #[test]
    fn manual_clock_advances_all_handles() {
        let clock = ManualClock::at_epoch();
        let handle = clock.clone();
        let start = clock.now();
        handle.advance(TimeDelta::hours(2));
        assert_eq!(clock.now() - start, TimeDelta::hours(2));
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualClock::at_epoch();
        let start = clock.now();
        clock.advance(TimeDelta::seconds(-30));
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn random_secrets_differ() {
        assert_ne!(random_secret(), random_secret());
    }
}
