//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qap_core::types::AccountId;

use super::role::Role;

/// Fixed identity of the synthesized super-administrator.
pub const SUPERADMIN_ACCOUNT_ID: AccountId = AccountId::from_u128(0x5aa0_0000_0000_4000_8000_0000_0000_0001);

/// A person able to authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Login key; unique, stored normalized.
    pub email: String,
    /// National ID (CPF); unique.
    pub national_id: String,
    /// Account role.
    pub role: Role,
    /// Whether the account may start new sessions.
    pub active: bool,
    /// Whether the first-access flow has been completed.
    pub email_confirmed: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a new, active, unconfirmed account.
    pub fn new(
        name: impl Into<String>,
        email: &str,
        national_id: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            email: normalize_email(email),
            national_id: national_id.into(),
            role,
            active: true,
            email_confirmed: false,
            created_at,
        }
    }

    /// The in-memory super-administrator identity. Never persisted.
    pub fn superadmin(created_at: DateTime<Utc>) -> Self {
        Self {
            id: SUPERADMIN_ACCOUNT_ID,
            name: "Superadmin Root".to_string(),
            email: "superadmin@qap.system".to_string(),
            national_id: "000.000.000-00".to_string(),
            role: Role::SuperAdmin,
            active: true,
            email_confirmed: true,
            created_at,
        }
    }

    /// Whether this account may start a session, credentials aside.
    pub fn can_login(&self) -> bool {
        self.active && self.email_confirmed
    }
}

/// Normalize an email for use as a login key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
