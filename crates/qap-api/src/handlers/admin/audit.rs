//! Audit log handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;

use qap_core::types::pagination::PageResponse;
use qap_entity::audit::{AuditEvent, AuditFilter};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/audit
pub async fn search_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<AuditFilter>,
) -> Result<Json<ApiResponse<PageResponse<AuditEvent>>>, ApiError> {
    let page = state
        .audit_service
        .list(&auth, &filter, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/admin/audit/export
pub async fn export_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<AuditFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = state.audit_service.export_csv(&auth, &filter).await?;
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"audit.csv\""),
        ],
        csv,
    ))
}
