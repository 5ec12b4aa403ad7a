//! Audit log event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use qap_core::types::{AccountId, AuditEventId};

use crate::account::{Account, Role};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventKind {
    /// Successful login.
    Login,
    /// Rejected login (bad credentials, disabled, unconfirmed).
    LoginFailed,
    /// Login refused because a lockout window is active.
    LoginBlocked,
    /// A lockout window was opened.
    AccountLocked,
    /// Successful super-administrator login.
    SuperAdminLogin,
    /// Session closed by its owner.
    Logout,
    /// First-access token issued.
    FirstAccessRequested,
    /// Password defined through a first-access token.
    PasswordDefined,
    /// Password reset by an administrator.
    ResetPassword,
    /// Operative account created.
    CreateUser,
    /// Account profile updated.
    UpdateUser,
    /// Account activated or deactivated.
    ToggleUser,
    /// Operatives imported in bulk.
    ImportUsers,
    /// Administrator account created.
    CreateAdmin,
    /// Administrator account deleted.
    DeleteAdmin,
}

impl AuditEventKind {
    /// Return the kind as its wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::LoginBlocked => "LOGIN_BLOCKED",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::SuperAdminLogin => "SUPER_ADMIN_LOGIN",
            Self::Logout => "LOGOUT",
            Self::FirstAccessRequested => "FIRST_ACCESS_REQUESTED",
            Self::PasswordDefined => "PASSWORD_DEFINED",
            Self::ResetPassword => "RESET_PASSWORD",
            Self::CreateUser => "CREATE_USER",
            Self::UpdateUser => "UPDATE_USER",
            Self::ToggleUser => "TOGGLE_USER",
            Self::ImportUsers => "IMPORT_USERS",
            Self::CreateAdmin => "CREATE_ADMIN",
            Self::DeleteAdmin => "DELETE_ADMIN",
        }
    }

    const ALL: [Self; 15] = [
        Self::Login,
        Self::LoginFailed,
        Self::LoginBlocked,
        Self::AccountLocked,
        Self::SuperAdminLogin,
        Self::Logout,
        Self::FirstAccessRequested,
        Self::PasswordDefined,
        Self::ResetPassword,
        Self::CreateUser,
        Self::UpdateUser,
        Self::ToggleUser,
        Self::ImportUsers,
        Self::CreateAdmin,
        Self::DeleteAdmin,
    ];
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditEventKind {
    type Err = qap_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| qap_core::AppError::validation(format!("Invalid audit event type: '{s}'")))
    }
}

/// An immutable audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event identifier.
    pub id: AuditEventId,
    /// What happened.
    pub kind: AuditEventKind,
    /// The account that acted, when known.
    pub actor_id: Option<AccountId>,
    /// Display name (or attempted email) of the actor.
    pub actor_name: String,
    /// Role of the actor, when known.
    pub actor_role: Option<Role>,
    /// Free-text detail.
    pub detail: String,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Build an event from its parts.
    pub fn new(
        kind: AuditEventKind,
        actor_id: Option<AccountId>,
        actor_name: impl Into<String>,
        actor_role: Option<Role>,
        detail: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditEventId::new(),
            kind,
            actor_id,
            actor_name: actor_name.into(),
            actor_role,
            detail: detail.into(),
            timestamp,
        }
    }

    /// An event attributed to a known account.
    pub fn by_account(
        kind: AuditEventKind,
        actor: &Account,
        detail: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(
            kind,
            Some(actor.id),
            actor.name.clone(),
            Some(actor.role),
            detail,
            timestamp,
        )
    }

    /// An event attributed only to an email (e.g. a login for an unknown account).
    pub fn by_email(
        kind: AuditEventKind,
        email: &str,
        detail: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(kind, None, email, None, detail, timestamp)
    }
}

/// Criteria for listing and exporting audit events. Empty fields match all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Only events of this kind.
    pub kind: Option<AuditEventKind>,
    /// Only events by this actor.
    pub actor_id: Option<AccountId>,
    /// Only events at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only events at or before this instant.
    pub to: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// Whether `event` satisfies every set criterion.
    pub fn matches(&self, event: &AuditEvent) -> bool {
        self.kind.is_none_or(|kind| event.kind == kind)
            && self.actor_id.is_none_or(|id| event.actor_id == Some(id))
            && self.from.is_none_or(|from| event.timestamp >= from)
            && self.to.is_none_or(|to| event.timestamp <= to)
    }
}
