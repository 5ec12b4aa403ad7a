//! # qap-entity
//!
//! Domain entity models for QAP Total. Every struct in this crate is a
//! record persisted in the key/value store or a value object passed between
//! the authority, the services and the HTTP layer. All entities derive
//! `Debug`, `Clone`, `Serialize` and `Deserialize`.

pub mod account;
pub mod audit;
pub mod auth;
pub mod session;
