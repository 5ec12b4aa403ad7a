//! Request context carrying the authenticated account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qap_core::error::AppError;
use qap_core::types::AccountId;
use qap_entity::account::{Account, Role};
use qap_entity::audit::{AuditEvent, AuditEventKind};
use qap_entity::session::Session;

/// Context for the current authenticated request.
///
/// Built from the live session and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting account's ID.
    pub account_id: AccountId,
    /// The acting account's display name.
    pub name: String,
    /// The acting account's role at login.
    pub role: Role,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(account_id: AccountId, name: impl Into<String>, role: Role) -> Self {
        Self {
            account_id,
            name: name.into(),
            role,
        }
    }

    /// Context for the owner of `session`.
    pub fn from_session(session: &Session) -> Self {
        Self::from_account(&session.account)
    }

    /// Context acting as `account`.
    pub fn from_account(account: &Account) -> Self {
        Self::new(account.id, account.name.clone(), account.role)
    }

    /// An audit event performed by this caller.
    pub fn event(
        &self,
        kind: AuditEventKind,
        detail: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> AuditEvent {
        AuditEvent::new(
            kind,
            Some(self.account_id),
            self.name.clone(),
            Some(self.role),
            detail,
            timestamp,
        )
    }

    /// Fails unless the caller may manage field operatives.
    pub fn require_operative_manager(&self) -> Result<(), AppError> {
        if self.role.can_manage_operatives() {
            Ok(())
        } else {
            Err(AppError::forbidden("Administrator role required"))
        }
    }

    /// Fails unless the caller is the super-administrator.
    pub fn require_superadmin(&self) -> Result<(), AppError> {
        if self.role.can_manage_admins() {
            Ok(())
        } else {
            Err(AppError::forbidden("Super-administrator role required"))
        }
    }

    /// Fails unless the caller may administer `target`.
    pub fn require_can_manage(&self, target: &Account) -> Result<(), AppError> {
        match target.role {
            Role::Operative => self.require_operative_manager(),
            Role::Admin => self.require_superadmin(),
            Role::SuperAdmin => Err(AppError::forbidden(
                "The super-administrator cannot be managed",
            )),
        }
    }
}
