//! Authentication error taxonomy.
//!
//! Every rejected authority operation maps to exactly one [`AuthError`]
//! variant. Store and configuration failures travel inside
//! [`AuthError::Internal`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use qap_core::error::{AppError, ErrorKind};

/// Result alias for authority operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// A password policy rule a candidate password failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PasswordRule {
    /// Shorter than the configured minimum.
    MinLength {
        /// Required minimum number of characters.
        min: usize,
    },
    /// No uppercase letter.
    Uppercase,
    /// No lowercase letter.
    Lowercase,
    /// No ASCII digit.
    Digit,
    /// No character from the configured symbol set.
    Symbol,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinLength { min } => write!(f, "must be at least {min} characters long"),
            Self::Uppercase => write!(f, "must contain an uppercase letter"),
            Self::Lowercase => write!(f, "must contain a lowercase letter"),
            Self::Digit => write!(f, "must contain a digit"),
            Self::Symbol => write!(f, "must contain a symbol"),
        }
    }
}

/// Reasons an authority operation is rejected.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A lockout window is active for the email.
    #[error("Too many failed attempts. Try again in {remaining_minutes} minute(s).")]
    LockedOut {
        /// Whole minutes left in the window, rounded up.
        remaining_minutes: i64,
    },
    /// Unknown email or wrong password. The two are indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// The account has been deactivated by an administrator.
    #[error("Account is disabled. Contact an administrator.")]
    AccountDisabled,
    /// The first-access flow has not been completed.
    #[error("Email not confirmed. Complete first access to define your password.")]
    EmailUnconfirmed,
    /// Wrong super-administrator key.
    #[error("Invalid super-administrator key")]
    InvalidKey,
    /// No account has the given email.
    #[error("No account found for this email")]
    NotFound,
    /// The account already completed first access.
    #[error("Email already confirmed. Sign in with your password.")]
    AlreadyConfirmed,
    /// No pending verification token matches.
    #[error("Invalid or expired verification token")]
    InvalidToken,
    /// The new password violates the policy.
    #[error("Password does not meet the policy")]
    WeakPassword(Vec<PasswordRule>),
    /// The presented session token is missing, replaced or expired.
    #[error("Session is missing or expired")]
    SessionInvalid,
    /// A transient (possibly simulated) network failure.
    #[error("{0}")]
    Network(String),
    /// Store or other infrastructure failure.
    #[error(transparent)]
    Internal(AppError),
}

impl AuthError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LockedOut { .. } => "LOCKED_OUT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::EmailUnconfirmed => "EMAIL_UNCONFIRMED",
            Self::InvalidKey => "INVALID_KEY",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyConfirmed => "ALREADY_CONFIRMED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::SessionInvalid => "SESSION_INVALID",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The application error kind this rejection corresponds to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LockedOut { .. } => ErrorKind::RateLimited,
            Self::InvalidCredentials | Self::InvalidKey | Self::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            Self::AccountDisabled | Self::EmailUnconfirmed => ErrorKind::Forbidden,
            Self::NotFound => ErrorKind::NotFound,
            Self::AlreadyConfirmed => ErrorKind::Conflict,
            Self::InvalidToken | Self::WeakPassword(_) => ErrorKind::Validation,
            Self::Network(_) => ErrorKind::Network,
            Self::Internal(e) => e.kind,
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind {
            ErrorKind::Network => Self::Network(err.message),
            _ => Self::Internal(err),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(inner) => inner,
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_app_error_becomes_network_variant() {
        let err: AuthError = AppError::network("Network error. Please try again.").into();
        assert!(matches!(err, AuthError::Network(_)));
        assert_eq!(err.code(), "NETWORK_ERROR");

        let err: AuthError = AppError::store("disk full").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_into_app_error_keeps_kind() {
        let app: AppError = AuthError::LockedOut { remaining_minutes: 3 }.into();
        assert_eq!(app.kind, ErrorKind::RateLimited);
        assert!(app.message.contains("3 minute"));

        let app: AppError = AuthError::EmailUnconfirmed.into();
        assert_eq!(app.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_password_rule_serializes_tagged() {
        let json = serde_json::to_value(PasswordRule::MinLength { min: 8 }).unwrap();
        assert_eq!(json, serde_json::json!({"rule": "MIN_LENGTH", "min": 8}));
    }
}
