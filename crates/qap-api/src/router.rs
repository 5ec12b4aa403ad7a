//! Route definitions for the QAP Total HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(superadmin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Session endpoints: login, super-admin login, logout, session, first access
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/superadmin", post(handlers::auth::superadmin_login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/session", get(handlers::auth::session))
        .route("/auth/first-access", post(handlers::auth::first_access))
        .route("/auth/password", post(handlers::auth::define_password))
}

/// Operative management and audit
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/users",
            get(handlers::admin::users::list_users).post(handlers::admin::users::create_user),
        )
        .route("/admin/users/import", post(handlers::admin::users::import_users))
        .route("/admin/users/{id}", put(handlers::admin::users::update_user))
        .route(
            "/admin/users/{id}/active",
            post(handlers::admin::users::set_active),
        )
        .route(
            "/admin/users/{id}/reset-password",
            post(handlers::admin::users::reset_password),
        )
        .route("/admin/audit", get(handlers::admin::audit::search_audit))
        .route(
            "/admin/audit/export",
            get(handlers::admin::audit::export_audit),
        )
}

/// Administrator management
fn superadmin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/superadmin/admins",
            get(handlers::superadmin::list_admins).post(handlers::superadmin::create_admin),
        )
        .route(
            "/superadmin/admins/{id}",
            delete(handlers::superadmin::delete_admin),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
