//! Administrator account management, reserved to the super-administrator.

use std::sync::Arc;

use tracing::info;

use qap_core::error::AppError;
use qap_core::traits::clock::Clock;
use qap_core::types::AccountId;
use qap_core::types::pagination::{PageRequest, PageResponse};
use qap_entity::account::{Account, Role};
use qap_entity::audit::AuditEventKind;
use qap_store::repositories::{
    AccountRepository, CredentialRepository, VerificationTokenRepository,
};

use super::service::{AccountFilter, AccountService, NewAccountRequest};
use crate::audit::AuditService;
use crate::context::RequestContext;

/// Handles administrator accounts.
#[derive(Debug, Clone)]
pub struct AdminService {
    accounts: Arc<AccountRepository>,
    credentials: Arc<CredentialRepository>,
    verifications: Arc<VerificationTokenRepository>,
    account_service: Arc<AccountService>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        accounts: Arc<AccountRepository>,
        credentials: Arc<CredentialRepository>,
        verifications: Arc<VerificationTokenRepository>,
        account_service: Arc<AccountService>,
        audit: Arc<AuditService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            credentials,
            verifications,
            account_service,
            audit,
            clock,
        }
    }

    /// Lists administrators whose name or email matches `query`.
    pub async fn list_admins(
        &self,
        ctx: &RequestContext,
        query: Option<String>,
        page: &PageRequest,
    ) -> Result<PageResponse<Account>, AppError> {
        ctx.require_superadmin()?;

        let filter = AccountFilter {
            query,
            active: None,
        };
        let admins: Vec<Account> = self
            .accounts
            .find_by_role(Role::Admin)
            .await?
            .into_iter()
            .filter(|account| filter.matches(account))
            .collect();
        Ok(page.paginate(admins))
    }

    /// Creates an administrator. Like operatives, new administrators define
    /// their own password through first access.
    pub async fn create_admin(
        &self,
        ctx: &RequestContext,
        req: NewAccountRequest,
    ) -> Result<Account, AppError> {
        ctx.require_superadmin()?;
        let account = self
            .account_service
            .create_account(ctx, req, Role::Admin)
            .await?;

        self.audit
            .record(ctx.event(
                AuditEventKind::CreateAdmin,
                format!("Created administrator {}", account.email),
                self.clock.now(),
            ))
            .await;
        Ok(account)
    }

    /// Permanently deletes an administrator and its credential.
    pub async fn delete_admin(&self, ctx: &RequestContext, id: AccountId) -> Result<(), AppError> {
        ctx.require_superadmin()?;

        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .filter(|account| account.role == Role::Admin)
            .ok_or_else(|| AppError::not_found("Administrator not found"))?;

        self.accounts.delete(account.id).await?;
        self.credentials.delete(&account.email).await?;
        self.verifications.remove_for_email(&account.email).await?;

        info!(actor_id = %ctx.account_id, account_id = %account.id, "Administrator deleted");
        self.audit
            .record(ctx.event(
                AuditEventKind::DeleteAdmin,
                format!("Deleted administrator {}", account.email),
                self.clock.now(),
            ))
            .await;
        Ok(())
    }
}
