//! # qap-core
//!
//! Core crate for QAP Total. Contains the key/value store and clock traits,
//! configuration schemas, typed identifiers, pagination types, the network
//! simulator, and the unified error system.
//!
//! This crate has **no** internal dependencies on other QAP crates.

pub mod config;
pub mod error;
pub mod result;
pub mod simulation;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
