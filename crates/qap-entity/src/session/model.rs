//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::Account;

/// One authenticated browser context.
///
/// Created on login and destroyed on logout or lazily on the first access
/// after expiry. At most one session occupies the slot at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token. The persisted copy holds its SHA-256 digest.
    pub token: String,
    /// Snapshot of the account taken at login.
    pub account: Account,
    /// When the session was issued.
    pub issued_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is valid strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_valid_at(now)
    }
}
