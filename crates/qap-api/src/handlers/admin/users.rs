//! Operative management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use qap_core::types::AccountId;
use qap_core::types::pagination::PageResponse;
use qap_entity::account::Account;
use qap_service::account::{ImportReport, NewAccountRequest, UpdateAccountRequest};

use crate::dto::request::{AccountQuery, ImportRequest, SetActiveRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<ApiResponse<PageResponse<Account>>>, ApiError> {
    let page = state
        .account_service
        .list_operatives(&auth, &query.into(), &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewAccountRequest>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = state.account_service.create_operative(&auth, req).await?;
    Ok(Json(ApiResponse::ok(account)))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<AccountId>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = state.account_service.update_account(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(account)))
}

/// POST /api/admin/users/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<AccountId>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = state
        .account_service
        .set_active(&auth, id, req.active)
        .await?;
    Ok(Json(ApiResponse::ok(account)))
}

/// POST /api/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<AccountId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.account_service.reset_password(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password reset. A verification link was sent to the account email.",
    ))))
}

/// POST /api/admin/users/import
pub async fn import_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ApiResponse<ImportReport>>, ApiError> {
    let report = state
        .account_service
        .import_operatives(&auth, req.rows)
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}
