//! The session authority: credential verification, session issuance and
//! expiry, lockout bookkeeping and the first-access flow.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use qap_core::config::{AppConfig, AuthConfig, SessionConfig};
use qap_core::simulation::NetworkSimulator;
use qap_core::traits::clock::Clock;
use qap_entity::account::{Account, normalize_email};
use qap_entity::audit::{AuditEvent, AuditEventKind};
use qap_entity::auth::VerificationToken;
use qap_entity::session::Session;
use qap_store::repositories::{
    AccountRepository, AuditLogRepository, CredentialRepository, LoginAttemptRepository,
    SessionSlotRepository, VerificationTokenRepository,
};

use crate::error::{AuthError, AuthResult};
use crate::mailer::VerificationMailer;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::throttle::{KeyedLocks, LoginThrottle};
use crate::token;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// The authenticated account.
    pub account: Account,
    /// Bearer token of the new session.
    pub token: String,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for LoginOutcome {
    fn from(session: Session) -> Self {
        Self {
            account: session.account,
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

/// Owns every authentication state transition.
///
/// One instance serves the whole process. All state lives in the injected
/// repositories; the authority itself only holds locks.
pub struct SessionAuthority {
    accounts: Arc<AccountRepository>,
    credentials: Arc<CredentialRepository>,
    sessions: Arc<SessionSlotRepository>,
    verifications: Arc<VerificationTokenRepository>,
    audit: Arc<AuditLogRepository>,
    throttle: LoginThrottle,
    hasher: Arc<PasswordHasher>,
    /// Verified against when an email has no credential, so every
    /// `InvalidCredentials` costs one Argon2 verification.
    dummy_hash: String,
    validator: PasswordValidator,
    mailer: Arc<dyn VerificationMailer>,
    clock: Arc<dyn Clock>,
    simulator: NetworkSimulator,
    /// Serializes reads and writes of the session slot.
    slot_lock: Mutex<()>,
    /// One lock per verification token digest.
    token_locks: KeyedLocks,
    auth_config: AuthConfig,
    session_config: SessionConfig,
}

impl std::fmt::Debug for SessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthority")
            .field("session_config", &self.session_config)
            .field("simulation", &self.simulator.is_enabled())
            .finish()
    }
}

impl SessionAuthority {
    /// Creates the authority over its repositories and collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: Arc<AccountRepository>,
        credentials: Arc<CredentialRepository>,
        sessions: Arc<SessionSlotRepository>,
        attempts: Arc<LoginAttemptRepository>,
        verifications: Arc<VerificationTokenRepository>,
        audit: Arc<AuditLogRepository>,
        mailer: Arc<dyn VerificationMailer>,
        clock: Arc<dyn Clock>,
        config: &AppConfig,
    ) -> AuthResult<Self> {
        let hasher = PasswordHasher::new(&config.auth.hashing)?;
        let dummy_hash = hasher.hash_password(&token::generate_token())?;
        Ok(Self {
            accounts,
            credentials,
            sessions,
            verifications,
            audit,
            throttle: LoginThrottle::new(attempts, &config.auth),
            hasher: Arc::new(hasher),
            dummy_hash,
            validator: PasswordValidator::new(&config.auth),
            mailer,
            clock,
            simulator: NetworkSimulator::new(config.simulation.clone()),
            slot_lock: Mutex::new(()),
            token_locks: KeyedLocks::new(),
            auth_config: config.auth.clone(),
            session_config: config.session.clone(),
        })
    }

    /// The password hasher, shared with account seeding.
    pub fn hasher(&self) -> Arc<PasswordHasher> {
        Arc::clone(&self.hasher)
    }

    /// The clock this authority reads time from.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Authenticate with email and password.
    ///
    /// Checks run in a fixed order: active lockout, unknown email, disabled
    /// account, wrong password, unconfirmed email. Only unknown emails and
    /// wrong passwords count towards the lockout threshold. On success the
    /// failure counter is cleared and the new session replaces any previous
    /// one.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        self.simulator.round_trip("login").await?;
        let email = normalize_email(email);

        let result = {
            let _guard = self.throttle.lock(&email).await;
            self.login_locked(&email, password).await
        };
        self.throttle.prune();
        result
    }

    async fn login_locked(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        let now = self.clock.now();

        if let Some(remaining_minutes) = self.throttle.remaining_lockout(email, now).await? {
            warn!(email = %email, remaining_minutes, "Login refused during lockout");
            self.record(AuditEvent::by_email(
                AuditEventKind::LoginBlocked,
                email,
                format!("Locked for {remaining_minutes} more minute(s)"),
                now,
            ))
            .await;
            return Err(AuthError::LockedOut { remaining_minutes });
        }

        let Some(account) = self.accounts.find_by_email(email).await? else {
            self.verify_credential(password, None)?;
            self.record_failed_login(email, None, now).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !account.active {
            info!(account_id = %account.id, "Login refused: account disabled");
            self.record(AuditEvent::by_account(
                AuditEventKind::LoginFailed,
                &account,
                "Account disabled",
                now,
            ))
            .await;
            return Err(AuthError::AccountDisabled);
        }

        let stored = self.credentials.find_hash(email).await?;
        if !self.verify_credential(password, stored.as_deref())? {
            self.record_failed_login(email, Some(&account), now).await?;
            return Err(AuthError::InvalidCredentials);
        }

        if !account.email_confirmed {
            info!(account_id = %account.id, "Login refused: email not confirmed");
            self.record(AuditEvent::by_account(
                AuditEventKind::LoginFailed,
                &account,
                "Email not confirmed",
                now,
            ))
            .await;
            return Err(AuthError::EmailUnconfirmed);
        }

        self.throttle.reset(email).await?;
        let ttl = hours(self.session_config.ttl_hours);
        let session = self.open_session(account, ttl, now).await?;

        info!(
            account_id = %session.account.id,
            role = %session.account.role,
            expires_at = %session.expires_at,
            "Login successful"
        );
        self.record(AuditEvent::by_account(
            AuditEventKind::Login,
            &session.account,
            "Login successful",
            now,
        ))
        .await;

        Ok(session.into())
    }

    /// Check `password` against the stored hash, or against the dummy hash
    /// when there is none. A missing hash never matches.
    fn verify_credential(&self, password: &str, stored: Option<&str>) -> AuthResult<bool> {
        match stored {
            Some(hash) => Ok(self.hasher.verify_password(password, hash)?),
            None => {
                self.hasher.verify_password(password, &self.dummy_hash)?;
                Ok(false)
            }
        }
    }

    async fn record_failed_login(
        &self,
        email: &str,
        account: Option<&Account>,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        let outcome = self.throttle.record_failure(email, now).await?;

        let detail = format!("Invalid credentials (attempt {})", outcome.attempts);
        let event = match account {
            Some(account) => AuditEvent::by_account(AuditEventKind::LoginFailed, account, detail, now),
            None => AuditEvent::by_email(AuditEventKind::LoginFailed, email, detail, now),
        };
        self.record(event).await;

        if outcome.locked {
            let minutes = self.auth_config.lockout_duration_minutes;
            self.record(AuditEvent::by_email(
                AuditEventKind::AccountLocked,
                email,
                format!("Locked for {minutes} minute(s)"),
                now,
            ))
            .await;
        }
        Ok(())
    }

    /// Authenticate with the super-administrator key.
    ///
    /// This path keeps no failure counter and never locks out.
    pub async fn login_superadmin(&self, key: &str) -> AuthResult<LoginOutcome> {
        self.simulator.round_trip("login_superadmin").await?;
        let now = self.clock.now();
        let account = Account::superadmin(now);

        if token::digest(key) != token::digest(&self.auth_config.superadmin_key) {
            warn!("Super-administrator login refused: invalid key");
            self.record(AuditEvent::by_email(
                AuditEventKind::LoginFailed,
                &account.email,
                "Invalid super-administrator key",
                now,
            ))
            .await;
            return Err(AuthError::InvalidKey);
        }

        let ttl = hours(self.session_config.superadmin_ttl_hours);
        let session = self.open_session(account, ttl, now).await?;

        info!(expires_at = %session.expires_at, "Super-administrator login successful");
        self.record(AuditEvent::by_account(
            AuditEventKind::SuperAdminLogin,
            &session.account,
            "Super-administrator login",
            now,
        ))
        .await;

        Ok(session.into())
    }

    /// Start the first-access flow for an account that has not confirmed
    /// its email yet. The token goes to the mailer only.
    pub async fn request_first_access(&self, email: &str) -> AuthResult<()> {
        self.simulator.round_trip("request_first_access").await?;
        let email = normalize_email(email);

        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;
        if account.email_confirmed {
            return Err(AuthError::AlreadyConfirmed);
        }

        self.issue_first_access(&account).await?;
        self.record(AuditEvent::by_account(
            AuditEventKind::FirstAccessRequested,
            &account,
            "First-access token issued",
            self.clock.now(),
        ))
        .await;
        Ok(())
    }

    /// Mint a first-access token for `account` and hand it to the mailer.
    ///
    /// Any token issued earlier for the same email stops being valid.
    pub async fn issue_first_access(&self, account: &Account) -> AuthResult<()> {
        let now = self.clock.now();
        let superseded = self.verifications.remove_for_email(&account.email).await?;

        let raw = token::generate_token();
        let record = VerificationToken {
            email: account.email.clone(),
            issued_at: now,
        };
        self.verifications
            .insert(&token::digest(&raw), &record)
            .await?;
        self.mailer
            .deliver_first_access(&account.email, &raw)
            .await?;

        info!(account_id = %account.id, superseded, "First-access token issued");
        Ok(())
    }

    /// Define the password of the account a first-access token was issued
    /// for, confirming its email.
    ///
    /// A weak password leaves the token usable; every other outcome
    /// consumes it.
    pub async fn define_password(&self, raw_token: &str, new_password: &str) -> AuthResult<()> {
        self.simulator.round_trip("define_password").await?;
        let digest = token::digest(raw_token);

        let result = {
            let _guard = self.token_locks.acquire(&digest).await;
            self.define_password_locked(&digest, new_password).await
        };
        self.token_locks.prune();
        result
    }

    async fn define_password_locked(&self, digest: &str, new_password: &str) -> AuthResult<()> {
        let now = self.clock.now();
        let record = self
            .verifications
            .find(digest)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if let Some(ttl) = self.auth_config.verification_token_ttl_minutes {
            let ttl = Duration::minutes(i64::try_from(ttl).unwrap_or(i64::MAX / 60_000));
            if now - record.issued_at >= ttl {
                debug!(email = %record.email, "Verification token expired");
                self.verifications.remove(digest).await?;
                return Err(AuthError::InvalidToken);
            }
        }

        self.validator
            .validate(new_password)
            .map_err(AuthError::WeakPassword)?;

        let Some(mut account) = self.accounts.find_by_email(&record.email).await? else {
            warn!(email = %record.email, "Verification token points at a missing account");
            self.verifications.remove(digest).await?;
            return Err(AuthError::InvalidToken);
        };

        let hash = self.hasher.hash_password(new_password)?;
        self.credentials.set_hash(&account.email, &hash).await?;
        account.email_confirmed = true;
        self.accounts.update(&account).await?;
        self.verifications.remove_for_email(&account.email).await?;

        info!(account_id = %account.id, "Password defined, email confirmed");
        self.record(AuditEvent::by_account(
            AuditEventKind::PasswordDefined,
            &account,
            "Password defined through first access",
            now,
        ))
        .await;
        Ok(())
    }

    /// Close the current session. Logging out with no session is a no-op.
    pub async fn logout(&self) -> AuthResult<()> {
        let _guard = self.slot_lock.lock().await;
        let Some(session) = self.sessions.load().await? else {
            return Ok(());
        };
        self.sessions.clear().await?;

        info!(account_id = %session.account.id, "Logout");
        self.record(AuditEvent::by_account(
            AuditEventKind::Logout,
            &session.account,
            "Logout",
            self.clock.now(),
        ))
        .await;
        Ok(())
    }

    /// The current session, if one exists and has not expired.
    ///
    /// The returned session carries the token digest, not the bearer token.
    ///
    /// An expired session is deleted on the way out, so it is never
    /// returned again.
    pub async fn current_session(&self) -> AuthResult<Option<Session>> {
        let _guard = self.slot_lock.lock().await;
        let Some(session) = self.sessions.load().await? else {
            return Ok(None);
        };

        if session.is_expired_at(self.clock.now()) {
            debug!(account_id = %session.account.id, "Session expired, clearing slot");
            self.sessions.clear().await?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Resolve a bearer token to the live session it belongs to.
    pub async fn validate_token(&self, raw_token: &str) -> AuthResult<Session> {
        match self.current_session().await? {
            Some(session) if session.token == token::digest(raw_token) => Ok(session),
            _ => Err(AuthError::SessionInvalid),
        }
    }

    async fn open_session(
        &self,
        account: Account,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AuthResult<Session> {
        let session = Session {
            token: token::generate_token(),
            account,
            issued_at: now,
            expires_at: now + ttl,
        };
        let persisted = Session {
            token: token::digest(&session.token),
            ..session.clone()
        };

        let _guard = self.slot_lock.lock().await;
        self.sessions.save(&persisted).await?;
        Ok(session)
    }

    async fn record(&self, event: AuditEvent) {
        if let Err(e) = self.audit.append(&event).await {
            error!(kind = %event.kind, error = %e, "Failed to write audit event");
        }
    }
}

fn hours(value: u64) -> Duration {
    Duration::hours(i64::try_from(value).unwrap_or(i64::MAX / 3_600_000))
}
