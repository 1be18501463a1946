//! Refresh eligibility.
//!
//! Only the hourly gate drives decisions. Manual refreshes never consult it.
use std::time::Duration;

use crate::model::EpochMillis;

/// Minimum time between automatic refresh cycles.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Reserved: a daily interval carried over from the portal script's
/// configuration. No refresh decision consults it.
pub const DAILY_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// True iff at least `interval` has elapsed between `last_check_at` and `now`.
pub fn is_auto_refresh_due(now: EpochMillis, last_check_at: EpochMillis, interval: Duration) -> bool {
    let interval_ms = EpochMillis::try_from(interval.as_millis()).unwrap_or(EpochMillis::MAX);
    now.saturating_sub(last_check_at) >= interval_ms
}

/// Automatic refresh gate with a configurable interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub interval: Duration,
}

impl RefreshPolicy {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn is_due(&self, now: EpochMillis, last_check_at: EpochMillis) -> bool {
        is_auto_refresh_due(now, last_check_at, self.interval)
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(CHECK_INTERVAL)
    }
}
