//! Request DTOs.

use serde::{Deserialize, Serialize};

use qap_service::account::{AccountFilter, ImportRow};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Super-administrator login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperAdminLoginRequest {
    /// Super-administrator key.
    pub key: String,
}

/// First-access request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstAccessRequest {
    /// Email of the account completing first access.
    pub email: String,
}

/// Password definition request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinePasswordRequest {
    /// First-access token received by email.
    pub token: String,
    /// The new password.
    pub password: String,
}

/// Activation toggle request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetActiveRequest {
    /// Target state.
    pub active: bool,
}

/// Bulk import request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Rows in file order.
    pub rows: Vec<ImportRow>,
}

/// Account listing filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountQuery {
    /// Case-insensitive match on name, email or CPF.
    pub q: Option<String>,
    /// Only active (or inactive) accounts.
    pub active: Option<bool>,
}

impl From<AccountQuery> for AccountFilter {
    fn from(query: AccountQuery) -> Self {
        Self {
            query: query.q,
            active: query.active,
        }
    }
}
