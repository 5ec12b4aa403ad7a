//! Auth handlers: login, super-administrator login, logout, session, first
//! access and password definition.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{
    DefinePasswordRequest, FirstAccessRequest, LoginRequest, SuperAdminLoginRequest,
};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let outcome = state.authority.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(outcome.into())))
}

/// POST /api/auth/superadmin
pub async fn superadmin_login(
    State(state): State<AppState>,
    Json(req): Json<SuperAdminLoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let outcome = state.authority.login_superadmin(&req.key).await?;
    Ok(Json(ApiResponse::ok(outcome.into())))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.authority.logout().await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// GET /api/auth/session
pub async fn session(auth: AuthUser) -> Json<ApiResponse<SessionResponse>> {
    Json(ApiResponse::ok(auth.session().clone().into()))
}

/// POST /api/auth/first-access
pub async fn first_access(
    State(state): State<AppState>,
    Json(req): Json<FirstAccessRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.authority.request_first_access(&req.email).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "A verification link was sent to your email",
    ))))
}

/// POST /api/auth/password
pub async fn define_password(
    State(state): State<AppState>,
    Json(req): Json<DefinePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .authority
        .define_password(&req.token, &req.password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password defined. You can now sign in.",
    ))))
}
