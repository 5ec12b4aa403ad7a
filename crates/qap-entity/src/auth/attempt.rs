//! Per-email failed login tracker.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Consecutive failed login attempts for one email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    /// Normalized email the attempts were made against.
    pub email: String,
    /// Consecutive failures since the last success or lockout.
    pub attempts: u32,
    /// End of the current (or most recent) lockout window.
    pub blocked_until: Option<DateTime<Utc>>,
}

impl LoginAttempt {
    /// A fresh tracker with no failures.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            attempts: 0,
            blocked_until: None,
        }
    }

    /// Whether a lockout window is active at `now`.
    pub fn is_blocked_at(&self, now: DateTime<Utc>) -> bool {
        self.blocked_until.is_some_and(|until| now < until)
    }

    /// Whole minutes left in the lockout window, rounded up.
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> i64 {
        match self.blocked_until {
            Some(until) if now < until => {
                let millis = (until - now).num_milliseconds();
                (millis + 59_999) / 60_000
            }
            _ => 0,
        }
    }

    /// Record one failure. Reaching `threshold` opens a lockout window of
    /// `window` and resets the counter. Returns `true` when the lockout was
    /// entered by this failure.
    pub fn register_failure(&mut self, now: DateTime<Utc>, threshold: u32, window: Duration) -> bool {
        self.attempts += 1;
        if self.attempts >= threshold {
            self.blocked_until = Some(now + window);
            self.attempts = 0;
            return true;
        }
        false
    }
}
