//! Field-operative management and the operations shared by every
//! managed account: profile updates, activation and password resets.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use qap_auth::SessionAuthority;
use qap_core::error::{AppError, ErrorKind};
use qap_core::traits::clock::Clock;
use qap_core::types::AccountId;
use qap_core::types::pagination::{PageRequest, PageResponse};
use qap_entity::account::{Account, Role, normalize_email};
use qap_entity::audit::AuditEventKind;
use qap_store::repositories::{
    AccountRepository, CredentialRepository, VerificationTokenRepository,
};

use super::import::{ImportReport, ImportRow};
use super::validation::{cpf_digits, format_cpf, is_valid_cpf, is_valid_email, validate_fields};
use crate::audit::AuditService;
use crate::context::RequestContext;

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccountRequest {
    /// Display name.
    pub name: String,
    /// Email (login key).
    pub email: String,
    /// CPF.
    pub national_id: String,
}

/// Request to update an account's profile. Absent fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New CPF.
    pub national_id: Option<String>,
}

/// Filters for listing operatives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountFilter {
    /// Case-insensitive match on name or email, or a substring of the CPF.
    pub query: Option<String>,
    /// Only active (or only inactive) accounts.
    pub active: Option<bool>,
}

impl AccountFilter {
    /// Whether `account` satisfies the filter.
    pub fn matches(&self, account: &Account) -> bool {
        let query_ok = match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let lowered = query.to_lowercase();
                let digits = cpf_digits(query);
                account.name.to_lowercase().contains(&lowered)
                    || account.email.contains(&lowered)
                    || account.national_id.contains(query)
                    || (!digits.is_empty() && cpf_digits(&account.national_id).contains(&digits))
            }
        };
        query_ok && self.active.is_none_or(|active| account.active == active)
    }
}

/// Handles operative administration and shared account mutations.
#[derive(Debug, Clone)]
pub struct AccountService {
    accounts: Arc<AccountRepository>,
    credentials: Arc<CredentialRepository>,
    verifications: Arc<VerificationTokenRepository>,
    authority: Arc<SessionAuthority>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        accounts: Arc<AccountRepository>,
        credentials: Arc<CredentialRepository>,
        verifications: Arc<VerificationTokenRepository>,
        authority: Arc<SessionAuthority>,
        audit: Arc<AuditService>,
    ) -> Self {
        let clock = authority.clock();
        Self {
            accounts,
            credentials,
            verifications,
            authority,
            audit,
            clock,
        }
    }

    /// Lists field operatives, oldest first.
    pub async fn list_operatives(
        &self,
        ctx: &RequestContext,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<Account>, AppError> {
        ctx.require_operative_manager()?;

        let operatives: Vec<Account> = self
            .accounts
            .find_by_role(Role::Operative)
            .await?
            .into_iter()
            .filter(|account| filter.matches(account))
            .collect();
        Ok(page.paginate(operatives))
    }

    /// Gets a single account the caller may manage.
    pub async fn get_account(&self, ctx: &RequestContext, id: AccountId) -> Result<Account, AppError> {
        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;
        ctx.require_can_manage(&account)?;
        Ok(account)
    }

    /// Creates a field operative. The new account is active, unconfirmed
    /// and has no password; its owner goes through first access.
    pub async fn create_operative(
        &self,
        ctx: &RequestContext,
        req: NewAccountRequest,
    ) -> Result<Account, AppError> {
        ctx.require_operative_manager()?;
        let account = self.create_account(ctx, req, Role::Operative).await?;

        self.audit
            .record(ctx.event(
                AuditEventKind::CreateUser,
                format!("Created operative {}", account.email),
                self.clock.now(),
            ))
            .await;
        Ok(account)
    }

    pub(crate) async fn create_account(
        &self,
        ctx: &RequestContext,
        req: NewAccountRequest,
        role: Role,
    ) -> Result<Account, AppError> {
        validate_fields(&req.name, &req.email, &req.national_id)?;

        let account = Account::new(
            req.name.trim(),
            &req.email,
            format_cpf(&req.national_id),
            role,
            self.clock.now(),
        );
        self.accounts.create(&account).await?;

        info!(
            actor_id = %ctx.account_id,
            account_id = %account.id,
            role = %account.role,
            "Account created"
        );
        Ok(account)
    }

    /// Updates name, email or CPF of an account the caller may manage.
    pub async fn update_account(
        &self,
        ctx: &RequestContext,
        id: AccountId,
        req: UpdateAccountRequest,
    ) -> Result<Account, AppError> {
        let mut account = self.get_account(ctx, id).await?;
        let previous_email = account.email.clone();
        let previous_cpf = cpf_digits(&account.national_id);

        if let Some(name) = req.name {
            account.name = name.trim().to_string();
        }
        if let Some(email) = req.email {
            account.email = normalize_email(&email);
        }
        if let Some(national_id) = req.national_id {
            account.national_id = format_cpf(&national_id);
        }

        if account.name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if account.email != previous_email && !is_valid_email(&account.email) {
            return Err(AppError::validation("Invalid email"));
        }
        let cpf_changed = cpf_digits(&account.national_id) != previous_cpf;
        if cpf_changed && !is_valid_cpf(&account.national_id) {
            return Err(AppError::validation("Invalid CPF"));
        }

        self.accounts.update(&account).await?;

        if account.email != previous_email {
            if let Some(hash) = self.credentials.find_hash(&previous_email).await? {
                self.credentials.set_hash(&account.email, &hash).await?;
                self.credentials.delete(&previous_email).await?;
            }
            self.verifications.remove_for_email(&previous_email).await?;
        }

        info!(actor_id = %ctx.account_id, account_id = %account.id, "Account updated");
        self.audit
            .record(ctx.event(
                AuditEventKind::UpdateUser,
                format!("Updated account {}", account.email),
                self.clock.now(),
            ))
            .await;
        Ok(account)
    }

    /// Activates or deactivates an account. Deactivation is the only way
    /// operatives leave the system.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        id: AccountId,
        active: bool,
    ) -> Result<Account, AppError> {
        let mut account = self.get_account(ctx, id).await?;
        if account.id == ctx.account_id && !active {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }

        account.active = active;
        self.accounts.update(&account).await?;

        let verb = if active { "Activated" } else { "Deactivated" };
        info!(actor_id = %ctx.account_id, account_id = %account.id, active, "Account status changed");
        self.audit
            .record(ctx.event(
                AuditEventKind::ToggleUser,
                format!("{verb} account {}", account.email),
                self.clock.now(),
            ))
            .await;
        Ok(account)
    }

    /// Drops the account's password and sends it back through first access.
    ///
    /// The first-access token is delivered before the credential goes, so a
    /// failed delivery leaves the old password working.
    pub async fn reset_password(&self, ctx: &RequestContext, id: AccountId) -> Result<(), AppError> {
        let mut account = self.get_account(ctx, id).await?;

        self.authority.issue_first_access(&account).await?;
        self.credentials.delete(&account.email).await?;
        account.email_confirmed = false;
        self.accounts.update(&account).await?;

        info!(actor_id = %ctx.account_id, account_id = %account.id, "Password reset");
        self.audit
            .record(ctx.event(
                AuditEventKind::ResetPassword,
                format!("Reset password of {}", account.email),
                self.clock.now(),
            ))
            .await;
        Ok(())
    }

    /// Imports field operatives row by row.
    ///
    /// Invalid rows are reported with their 1-based line number; rows whose
    /// email or CPF already exists are counted as duplicates. One bad row
    /// never aborts the rest.
    pub async fn import_operatives(
        &self,
        ctx: &RequestContext,
        rows: Vec<ImportRow>,
    ) -> Result<ImportReport, AppError> {
        ctx.require_operative_manager()?;
        let mut report = ImportReport::new(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            let line = index + 1;

            if !row.is_complete() {
                report.reject(line, "Incomplete data");
                continue;
            }
            if !is_valid_cpf(&row.national_id) {
                report.reject(line, "Invalid CPF");
                continue;
            }
            if !is_valid_email(row.email.trim()) {
                report.reject(line, "Invalid email");
                continue;
            }

            let req = NewAccountRequest {
                name: row.name,
                email: row.email,
                national_id: row.national_id,
            };
            match self.create_account(ctx, req, Role::Operative).await {
                Ok(_) => report.inserted += 1,
                Err(e) if e.kind == ErrorKind::Conflict => report.duplicates += 1,
                Err(e) => return Err(e),
            }
        }

        if !report.errors.is_empty() {
            warn!(rejected = report.errors.len(), "Import finished with rejected rows");
        }
        info!(
            actor_id = %ctx.account_id,
            total = report.total,
            inserted = report.inserted,
            duplicates = report.duplicates,
            "Operatives imported"
        );
        self.audit
            .record(ctx.event(
                AuditEventKind::ImportUsers,
                format!(
                    "Imported {} of {} rows ({} duplicates, {} errors)",
                    report.inserted,
                    report.total,
                    report.duplicates,
                    report.errors.len()
                ),
                self.clock.now(),
            ))
            .await;
        Ok(report)
    }
}
