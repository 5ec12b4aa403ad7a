//! Audit log service: recording, listing and export.

use std::sync::Arc;

use tracing::error;

use qap_core::error::AppError;
use qap_core::types::pagination::{PageRequest, PageResponse};
use qap_entity::audit::{AuditEvent, AuditFilter};
use qap_store::repositories::AuditLogRepository;

use super::export::render_csv;
use crate::context::RequestContext;

/// Audit log service.
#[derive(Debug, Clone)]
pub struct AuditService {
    audit_repo: Arc<AuditLogRepository>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_repo }
    }

    /// Append an event. A failed write is logged and otherwise ignored so
    /// it never fails the operation being audited.
    pub async fn record(&self, event: AuditEvent) {
        if let Err(e) = self.audit_repo.append(&event).await {
            error!(kind = %event.kind, error = %e, "Failed to write audit event");
        }
    }

    /// Lists events matching `filter`, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<AuditEvent>, AppError> {
        ctx.require_operative_manager()?;
        self.audit_repo.find_all(filter, page).await
    }

    /// Exports every event matching `filter` as CSV.
    pub async fn export_csv(
        &self,
        ctx: &RequestContext,
        filter: &AuditFilter,
    ) -> Result<String, AppError> {
        ctx.require_operative_manager()?;
        let events = self.audit_repo.find_matching(filter).await?;
        Ok(render_csv(&events))
    }
}
