//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use qap_auth::AuthError;
use qap_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// A rejected authority operation.
    Auth(AuthError),
    /// Any other application failure.
    App(AppError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        ErrorKind::Network => (StatusCode::SERVICE_UNAVAILABLE, "NETWORK_ERROR"),
        ErrorKind::Store
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, Option<serde_json::Value>) {
        match self {
            Self::Auth(AuthError::Internal(inner)) | Self::App(inner) => {
                let (status, code) = status_for(inner.kind);
                (status, code.to_string(), None)
            }
            Self::Auth(AuthError::WeakPassword(rules)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "WEAK_PASSWORD".to_string(),
                serde_json::to_value(rules).ok(),
            ),
            Self::Auth(err @ AuthError::LockedOut { remaining_minutes }) => (
                StatusCode::TOO_MANY_REQUESTS,
                err.code().to_string(),
                Some(serde_json::json!({ "remaining_minutes": remaining_minutes })),
            ),
            Self::Auth(err) => {
                let (status, _) = status_for(err.kind());
                (status, err.code().to_string(), None)
            }
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Auth(err) => err.to_string(),
            Self::App(err) => err.message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();

        // Infrastructure details stay in the log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.message(), "Internal server error");
            "Internal server error".to_string()
        } else {
            self.message()
        };

        let body = ApiErrorResponse {
            error,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qap_auth::PasswordRule;

    #[test]
    fn test_auth_errors_map_to_status() {
        let cases = [
            (AuthError::LockedOut { remaining_minutes: 3 }, StatusCode::TOO_MANY_REQUESTS),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidKey, StatusCode::UNAUTHORIZED),
            (AuthError::AccountDisabled, StatusCode::FORBIDDEN),
            (AuthError::EmailUnconfirmed, StatusCode::FORBIDDEN),
            (AuthError::NotFound, StatusCode::NOT_FOUND),
            (AuthError::AlreadyConfirmed, StatusCode::CONFLICT),
            (AuthError::InvalidToken, StatusCode::BAD_REQUEST),
            (AuthError::Network("down".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_weak_password_lists_rules() {
        let err = ApiError::from(AuthError::WeakPassword(vec![
            PasswordRule::Uppercase,
            PasswordRule::Symbol,
        ]));
        let (status, code, details) = err.parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "WEAK_PASSWORD");
        assert_eq!(
            details,
            Some(serde_json::json!([{ "rule": "UPPERCASE" }, { "rule": "SYMBOL" }]))
        );
    }

    #[test]
    fn test_store_failure_is_opaque() {
        let err = ApiError::from(AppError::store("disk on fire"));
        assert_eq!(err.parts().0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
