//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header, checks it against the live session and injects the caller context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use qap_auth::AuthError;
use qap_entity::session::Session;
use qap_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    ctx: RequestContext,
    session: Session,
}

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    /// The session the bearer token belongs to.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

/// Bearer token from an `Authorization` header value.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::SessionInvalid)?;
        let session = state.authority.validate_token(token).await?;

        Ok(AuthUser {
            ctx: RequestContext::from_session(&session),
            session,
        })
    }
}
