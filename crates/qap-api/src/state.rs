//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use qap_auth::SessionAuthority;
use qap_core::config::AppConfig;
use qap_service::{AccountService, AdminService, AuditService, Services};
use qap_store::StoreManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Key/value store
    pub store: Arc<StoreManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// Session authority
    pub authority: Arc<SessionAuthority>,

    // ── Services ─────────────────────────────────────────────
    /// Operative administration
    pub account_service: Arc<AccountService>,
    /// Administrator administration
    pub admin_service: Arc<AdminService>,
    /// Audit queries and export
    pub audit_service: Arc<AuditService>,
}

impl AppState {
    /// Build the state from a wired service graph.
    pub fn new(config: AppConfig, services: &Services) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::clone(&services.store),
            authority: Arc::clone(&services.authority),
            account_service: Arc::clone(&services.accounts),
            admin_service: Arc::clone(&services.admins),
            audit_service: Arc::clone(&services.audit),
        }
    }
}
