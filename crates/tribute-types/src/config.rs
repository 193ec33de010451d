//! Configuration for a Tribute gate.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::{Result, TributeError, constants};

/// Longest window accepted by [`GateConfig::validate`] (10 years).
const MAX_WINDOW_SECS: u64 = 10 * 365 * constants::SECS_PER_DAY;

/// Time windows governing audience resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Wait after a denial before the same requester may ask again.
    pub denial_cooldown_secs: u64,
    /// Age after which any party may time out an unanswered request.
    pub response_timeout_secs: u64,
    /// Minimum age before the requester may cancel.
    pub min_cancel_lock_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            denial_cooldown_secs: constants::DEFAULT_DENIAL_COOLDOWN_SECS,
            response_timeout_secs: constants::DEFAULT_RESPONSE_TIMEOUT_SECS,
            min_cancel_lock_secs: constants::DEFAULT_MIN_CANCEL_LOCK_SECS,
        }
    }
}

impl GateConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| TributeError::Configuration(format!("invalid gate config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject zero or absurdly long windows.
    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("denial_cooldown_secs", self.denial_cooldown_secs),
            ("response_timeout_secs", self.response_timeout_secs),
            ("min_cancel_lock_secs", self.min_cancel_lock_secs),
        ] {
            if secs == 0 {
                return Err(TributeError::Configuration(format!(
                    "{name} must be greater than zero"
                )));
            }
            if secs > MAX_WINDOW_SECS {
                return Err(TributeError::Configuration(format!(
                    "{name} = {secs} exceeds maximum of {MAX_WINDOW_SECS}"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn denial_cooldown(&self) -> TimeDelta {
        window(self.denial_cooldown_secs)
    }

    #[must_use]
    pub fn response_timeout(&self) -> TimeDelta {
        window(self.response_timeout_secs)
    }

    #[must_use]
    pub fn min_cancel_lock(&self) -> TimeDelta {
        window(self.min_cancel_lock_secs)
    }
}

fn window(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}
