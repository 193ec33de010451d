//! System-wide constants for the Tribute gate.

/// Seconds in one hour.
pub const SECS_PER_HOUR: u64 = 60 * 60;

/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Default wait after a denial before the same requester may ask the same
/// recipient again (3 days).
pub const DEFAULT_DENIAL_COOLDOWN_SECS: u64 = 3 * SECS_PER_DAY;

/// Default age after which anyone may time out an unanswered audience
/// request (3 days).
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 3 * SECS_PER_DAY;

/// Default minimum age before a requester may retract their own request
/// (2 hours). Stops zero-cost probing of recipients.
pub const DEFAULT_MIN_CANCEL_LOCK_SECS: u64 = 2 * SECS_PER_HOUR;

/// Domain separator for challenge commitments.
pub const CHALLENGE_DOMAIN: &[u8] = b"tribute:challenge:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Tribute";
