//! QAP Total Server: session authority and account administration
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use qap_api::{AppState, build_router};
use qap_auth::mailer;
use qap_core::config::AppConfig;
use qap_core::error::AppError;
use qap_core::traits::clock::{Clock, SystemClock};
use qap_service::Services;
use qap_store::StoreManager;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("QAP_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting QAP Total v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Initialize store ─────────────────────────────────
    tracing::info!(
        "Initializing store (provider: {})...",
        config.store.provider
    );
    let store = Arc::new(StoreManager::new(&config.store).await?);
    tracing::info!("Store initialized");

    // ── Step 2: Initialize services ──────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mailer = mailer::from_config(&config.auth, Arc::clone(&store), Arc::clone(&clock))?;
    let services = Services::build(&config, store, clock, mailer)?;

    // ── Step 3: Seed reference accounts ──────────────────────────
    let seeded = services.seed_if_empty().await?;
    if seeded > 0 {
        tracing::info!("Seeded {} reference accounts", seeded);
    }

    // ── Step 4: Build and start HTTP server ──────────────────────
    let addr = config.server.bind_address();
    let app = build_router(AppState::new(config, &services));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("QAP Total server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
