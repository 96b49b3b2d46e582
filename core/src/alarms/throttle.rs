//! Debounce and backoff state for repeating alarms.
//!
//! Both throttles work on wall-clock timestamps supplied by the caller;
//! nothing fires on its own.

use chrono::{Duration, NaiveDateTime};

/// Silence required after a spoken speed alarm before arming again
const SPEED_LIMIT_COOLDOWN_SECS: i64 = 120;
/// Violation must persist this long after arming before speaking
const SPEED_LIMIT_DELAY_SECS: i64 = 10;
/// Arming older than this is stale and dropped
const SPEED_LIMIT_STALE_SECS: i64 = 20;

/// First off-route repeat interval
const OFF_ROUTE_INITIAL_WAIT_SECS: i64 = 60;
const OFF_ROUTE_BACKOFF_FACTOR: f64 = 2.5;

/// Two-stage debounce for speed-limit alarms
#[derive(Debug, Clone, Default)]
pub struct SpeedLimitDebounce {
    last_spoken: Option<NaiveDateTime>,
    armed_at: Option<NaiveDateTime>,
}

impl SpeedLimitDebounce {
    /// Feed one over-the-limit observation. Returns true when the alarm
    /// should be spoken now; call `mark_spoken` once it has been.
    pub fn poll(&mut self, now: NaiveDateTime, enabled: bool) -> bool {
        match self.armed_at {
            None => {
                let cooled_down = self
                    .last_spoken
                    .is_none_or(|t| now - t > Duration::seconds(SPEED_LIMIT_COOLDOWN_SECS));
                if cooled_down {
                    self.armed_at = Some(now);
                }
                false
            }
            Some(armed) => {
                let waited = now - armed;
                if waited > Duration::seconds(SPEED_LIMIT_STALE_SECS) {
                    self.armed_at = None;
                    false
                } else {
                    enabled && waited > Duration::seconds(SPEED_LIMIT_DELAY_SECS)
                }
            }
        }
    }

    pub fn mark_spoken(&mut self, now: NaiveDateTime) {
        self.last_spoken = Some(now);
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }
}

/// Multiplicative backoff for repeated off-route alarms
#[derive(Debug, Clone)]
pub struct OffRouteBackoff {
    last: Option<NaiveDateTime>,
    /// Zero while unarmed
    wait: Duration,
}

impl Default for OffRouteBackoff {
    fn default() -> Self {
        Self {
            last: None,
            wait: Duration::zero(),
        }
    }
}

impl OffRouteBackoff {
    /// Whether an off-route alarm is due at `now`
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        match self.last {
            Some(last) if !self.wait.is_zero() => now - last > self.wait,
            _ => true,
        }
    }

    /// Record an alarm at `now` and grow the wait interval
    pub fn record(&mut self, now: NaiveDateTime) {
        self.wait = if self.wait.is_zero() {
            Duration::seconds(OFF_ROUTE_INITIAL_WAIT_SECS)
        } else {
            let millis = self.wait.num_milliseconds() as f64 * OFF_ROUTE_BACKOFF_FACTOR;
            Duration::milliseconds(millis as i64)
        };
        self.last = Some(now);
    }

    /// Current wait interval; zero while unarmed
    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
