//! First-access verification token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending first-access token.
///
/// Only the digest of the raw token is used as the storage key; the record
/// itself holds the email it was issued for and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    /// Normalized email the token was issued for.
    pub email: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
}
