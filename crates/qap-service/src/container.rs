//! Wiring of repositories, the session authority and services.

use std::sync::Arc;

use tracing::info;

use qap_auth::{SessionAuthority, VerificationMailer};
use qap_core::config::AppConfig;
use qap_core::error::AppError;
use qap_core::traits::clock::Clock;
use qap_store::StoreManager;
use qap_store::repositories::{
    AccountRepository, AuditLogRepository, CredentialRepository, LoginAttemptRepository,
    SessionSlotRepository, VerificationTokenRepository,
};

use crate::account::{AccountService, AdminService};
use crate::audit::AuditService;
use crate::bootstrap;

/// Every service of the application, built over one store.
#[derive(Debug, Clone)]
pub struct Services {
    /// The session authority.
    pub authority: Arc<SessionAuthority>,
    /// Operative administration.
    pub accounts: Arc<AccountService>,
    /// Administrator administration.
    pub admins: Arc<AdminService>,
    /// Audit queries.
    pub audit: Arc<AuditService>,
    /// The backing store.
    pub store: Arc<StoreManager>,
    account_repo: Arc<AccountRepository>,
    credential_repo: Arc<CredentialRepository>,
}

impl Services {
    /// Build the service graph over `store`.
    pub fn build(
        config: &AppConfig,
        store: Arc<StoreManager>,
        clock: Arc<dyn Clock>,
        mailer: Arc<dyn VerificationMailer>,
    ) -> Result<Self, AppError> {
        let account_repo = Arc::new(AccountRepository::new(Arc::clone(&store)));
        let credential_repo = Arc::new(CredentialRepository::new(Arc::clone(&store)));
        let session_repo = Arc::new(SessionSlotRepository::new(Arc::clone(&store)));
        let attempt_repo = Arc::new(LoginAttemptRepository::new(Arc::clone(&store)));
        let verification_repo = Arc::new(VerificationTokenRepository::new(Arc::clone(&store)));
        let audit_repo = Arc::new(AuditLogRepository::new(
            Arc::clone(&store),
            config.audit.max_events,
        ));

        let authority = Arc::new(SessionAuthority::new(
            Arc::clone(&account_repo),
            Arc::clone(&credential_repo),
            session_repo,
            attempt_repo,
            Arc::clone(&verification_repo),
            Arc::clone(&audit_repo),
            mailer,
            Arc::clone(&clock),
            config,
        )?);

        let audit = Arc::new(AuditService::new(audit_repo));
        let accounts = Arc::new(AccountService::new(
            Arc::clone(&account_repo),
            Arc::clone(&credential_repo),
            Arc::clone(&verification_repo),
            Arc::clone(&authority),
            Arc::clone(&audit),
        ));
        let admins = Arc::new(AdminService::new(
            Arc::clone(&account_repo),
            Arc::clone(&credential_repo),
            verification_repo,
            Arc::clone(&accounts),
            Arc::clone(&audit),
            clock,
        ));

        info!(
            simulation = config.simulation.enabled,
            "Services initialized"
        );

        Ok(Self {
            authority,
            accounts,
            admins,
            audit,
            store,
            account_repo,
            credential_repo,
        })
    }

    /// Seed the reference accounts into an empty store.
    pub async fn seed_if_empty(&self) -> Result<usize, AppError> {
        bootstrap::seed_if_empty(
            &self.account_repo,
            &self.credential_repo,
            &self.authority.hasher(),
            self.authority.clock().now(),
        )
        .await
    }
}
