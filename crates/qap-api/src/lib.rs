//! # qap-api
//!
//! HTTP API layer for QAP Total built on Axum.
//!
//! Provides the REST endpoints over the session authority and the
//! administration services, the bearer-token extractor, DTOs, request
//! logging and CORS middleware, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
