//! Per-email failed-login counting and lockout.
//!
//! Every read-modify-write of one email's counter happens while the caller
//! holds that email's lock from [`KeyedLocks`]. Different emails never
//! contend.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use qap_core::config::AuthConfig;
use qap_core::result::AppResult;
use qap_store::repositories::LoginAttemptRepository;

/// A map of independent async locks, one per key.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    /// Create an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock for `key`.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop lock entries nobody is holding or waiting on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// What a recorded failure did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// Counter value after the failure (0 when the lockout was entered).
    pub attempts: u32,
    /// Whether this failure opened a lockout window.
    pub locked: bool,
}

/// Lockout policy over the [`LoginAttemptRepository`].
#[derive(Debug)]
pub struct LoginThrottle {
    attempts: Arc<LoginAttemptRepository>,
    locks: KeyedLocks,
    max_failed_attempts: u32,
    lockout_window: Duration,
}

impl LoginThrottle {
    /// Create a throttle from auth configuration.
    pub fn new(attempts: Arc<LoginAttemptRepository>, config: &AuthConfig) -> Self {
        let minutes = i64::try_from(config.lockout_duration_minutes).unwrap_or(i64::MAX / 60_000);
        Self {
            attempts,
            locks: KeyedLocks::new(),
            max_failed_attempts: config.max_failed_attempts.max(1),
            lockout_window: Duration::minutes(minutes),
        }
    }

    /// Take the lock for `email`. Hold it across the whole login attempt.
    pub async fn lock(&self, email: &str) -> OwnedMutexGuard<()> {
        self.locks.acquire(email).await
    }

    /// Release bookkeeping for locks no longer in use.
    pub fn prune(&self) {
        self.locks.prune();
    }

    /// Minutes left in an active lockout window, or `None` if not blocked.
    pub async fn remaining_lockout(&self, email: &str, now: DateTime<Utc>) -> AppResult<Option<i64>> {
        Ok(self
            .attempts
            .find(email)
            .await?
            .filter(|attempt| attempt.is_blocked_at(now))
            .map(|attempt| attempt.remaining_minutes(now)))
    }

    /// Count one failed attempt, opening a lockout window at the threshold.
    pub async fn record_failure(&self, email: &str, now: DateTime<Utc>) -> AppResult<FailureOutcome> {
        let mut attempt = self.attempts.find_or_new(email).await?;
        let locked = attempt.register_failure(now, self.max_failed_attempts, self.lockout_window);
        self.attempts.save(&attempt).await?;

        if locked {
            warn!(
                email = %email,
                blocked_until = ?attempt.blocked_until,
                "Login locked after repeated failures"
            );
        } else {
            debug!(email = %email, attempts = attempt.attempts, "Failed login recorded");
        }

        Ok(FailureOutcome {
            attempts: attempt.attempts,
            locked,
        })
    }

    /// Forget all failures for `email`.
    pub async fn reset(&self, email: &str) -> AppResult<()> {
        self.attempts.clear(email).await
    }
}
