//! Administrator management handlers, reserved to the super-administrator.

use axum::Json;
use axum::extract::{Path, Query, State};

use qap_core::types::AccountId;
use qap_core::types::pagination::PageResponse;
use qap_entity::account::Account;
use qap_service::account::NewAccountRequest;

use crate::dto::request::AccountQuery;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/superadmin/admins
pub async fn list_admins(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<ApiResponse<PageResponse<Account>>>, ApiError> {
    let page = state
        .admin_service
        .list_admins(&auth, query.q, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/superadmin/admins
pub async fn create_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewAccountRequest>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = state.admin_service.create_admin(&auth, req).await?;
    Ok(Json(ApiResponse::ok(account)))
}

/// DELETE /api/superadmin/admins/{id}
pub async fn delete_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<AccountId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.admin_service.delete_admin(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Administrator deleted",
    ))))
}
